#![forbid(unsafe_code)]

//! Bounded infinite list by relocating boundary items.
//!
//! Instead of doubling the content, this strategy keeps a single copy of the
//! list and rotates it: an item that scrolls out above the visible band is
//! moved to the tail, and the document is scrolled back by the height it
//! vacated so nothing on screen moves. Scrolling back up reverses the moves
//! in LIFO order.
//!
//! The list is a logical ring of item descriptors. Rotations are recorded as
//! [`RecycleEffect`]s for the host to mirror on its nodes, and
//! [`RecyclingLoopController::layout`] maps the ring order back to y
//! positions.
//!
//! # Coordinates
//!
//! `physical` is the platform scroll position. `cumulative` is the sum of
//! all shifts on the stack; `physical + cumulative` is where the viewport
//! would be if no item had moved, and a relocation leaves it unchanged.
//!
//! With `base_line = list_top - gap - top_offset + buffer`:
//!
//! - forward: move the head while its bottom edge is more than `buffer`
//!   above `top_offset`, i.e. `physical > list_top + height + buffer -
//!   top_offset`;
//! - backward: pop the top entry while `physical <= base_line`. Written in
//!   unshifted coordinates this is `physical + top.cumulative_threshold <=
//!   top.cumulative_threshold + base_line`; the threshold cancels.
//!
//! Restoring an item makes the backward condition false exactly when the
//! forward condition would move it again, so the two passes never undo each
//! other on the same position. The buffer sits above the band edge rather
//! than below it: a list that starts at the top of the document could
//! otherwise never restore its first item, since that would need a negative
//! scroll position.
//!
//! # Invariants
//!
//! 1. `sum(entry.shift_amount) == top.cumulative_threshold`.
//! 2. Ring order equals natural order rotated left by `stack.len()`.
//! 3. A forward-then-backward traversal over the same positions restores
//!    the natural order, an empty stack and the starting position.
//! 4. Relocations per pass are bounded by the item count.
//!
//! # Failure Modes
//!
//! - Fewer than two items: nothing is ever moved.
//! - An item height that is zero or non-finite stops the pass (not ready).

use std::collections::VecDeque;

use drift_core::config::RecycleConfig;
use drift_core::geometry::ready_extent;
use tracing::{debug, trace, warn};

/// Stable identifier of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u32);

impl ItemId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Item descriptor in the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecycleItem {
    pub id: ItemId,
    /// Rendered height in pixels.
    pub height: f64,
}

impl RecycleItem {
    #[must_use]
    pub const fn new(id: ItemId, height: f64) -> Self {
        Self { id, height }
    }
}

/// One head-to-tail move on the undo stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecycleEntry {
    /// Item that was moved (a reference, the ring owns the descriptor).
    pub item: ItemId,
    /// Scroll compensation applied for this move.
    pub shift_amount: f64,
    /// Sum of `shift_amount` over this entry and all entries below it.
    pub cumulative_threshold: f64,
}

/// Node move the host must mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecycleEffect {
    MovedToTail(ItemId),
    MovedToHead(ItemId),
}

/// Output of one pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecyclePass {
    /// Node moves in the order they happened.
    pub effects: Vec<RecycleEffect>,
    /// Relative scroll adjustment the host must apply (`scroll_by`).
    pub scroll_delta: f64,
}

impl RecyclePass {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Ring-buffer recycling controller.
#[derive(Debug, Clone, Default)]
pub struct RecyclingLoopController {
    config: RecycleConfig,
    list_top: f64,
    ring: VecDeque<RecycleItem>,
    stack: Vec<RecycleEntry>,
}

impl RecyclingLoopController {
    #[must_use]
    pub fn new(config: RecycleConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Document y of the list's first item.
    #[must_use]
    pub fn with_list_top(mut self, list_top: f64) -> Self {
        self.set_list_top(list_top);
        self
    }

    pub fn set_list_top(&mut self, list_top: f64) {
        if list_top.is_finite() {
            self.list_top = list_top;
        }
    }

    /// Replace the items in natural order. Clears the stack.
    pub fn set_items(&mut self, items: impl IntoIterator<Item = RecycleItem>) {
        self.ring = items.into_iter().collect();
        self.stack.clear();
    }

    /// Update one item's measured height. Returns `false` if unknown.
    pub fn set_item_height(&mut self, id: ItemId, height: f64) -> bool {
        match self.ring.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.height = height;
                true
            }
            None => false,
        }
    }

    fn gap(&self) -> f64 {
        self.config.item_gap.max(0.0)
    }

    fn base_line(&self) -> f64 {
        self.list_top - self.gap() + self.config.buffer - self.config.top_offset
    }

    /// Document y of the item at ring position `index`.
    fn item_top(&self, index: usize) -> f64 {
        let gap = self.gap();
        self.list_top
            + self
                .ring
                .iter()
                .take(index)
                .map(|item| ready_extent(item.height).unwrap_or(0.0) + gap)
                .sum::<f64>()
    }

    /// Handle one scroll notification at `position`.
    pub fn on_scroll(&mut self, position: f64) -> RecyclePass {
        let mut pass = RecyclePass::default();
        if !position.is_finite() {
            return pass;
        }
        let mut physical = position;

        self.forward(&mut physical, &mut pass);
        if pass.is_empty() {
            self.backward(&mut physical, &mut pass);
        }

        pass.scroll_delta = physical - position;
        if !pass.is_empty() {
            debug!(
                target: "drift.recycle",
                moves = pass.effects.len(),
                scroll_delta = pass.scroll_delta,
                depth = self.stack.len(),
                "items relocated"
            );
        }
        pass
    }

    fn forward(&mut self, physical: &mut f64, pass: &mut RecyclePass) {
        let band_top = self.config.top_offset - self.config.buffer;
        for _ in 0..self.ring.len() {
            if self.ring.len() < 2 {
                break;
            }
            let Some(head) = self.ring.front().copied() else {
                break;
            };
            let Some(height) = ready_extent(head.height) else {
                trace!(target: "drift.recycle", item = head.id.get(), "head height not ready");
                break;
            };
            let head_bottom = self.list_top + height - *physical;
            if head_bottom >= band_top {
                break;
            }

            let before = self.item_top(1);
            self.ring.rotate_left(1);
            let after = self.item_top(0);
            let shift = before - after;

            *physical -= shift;
            let cumulative = self.cumulative_shift() + shift;
            self.stack.push(RecycleEntry {
                item: head.id,
                shift_amount: shift,
                cumulative_threshold: cumulative,
            });
            pass.effects.push(RecycleEffect::MovedToTail(head.id));
        }
    }

    fn backward(&mut self, physical: &mut f64, pass: &mut RecyclePass) {
        let base_line = self.base_line();
        while let Some(entry) = self.stack.last().copied() {
            if *physical > base_line {
                break;
            }
            let Some(tail) = self.ring.back().copied() else {
                break;
            };
            if tail.id != entry.item {
                warn!(
                    target: "drift.recycle",
                    expected = entry.item.get(),
                    found = tail.id.get(),
                    "ring tail does not match stack"
                );
                break;
            }
            if ready_extent(tail.height).is_none() {
                trace!(target: "drift.recycle", item = tail.id.get(), "tail height not ready");
                break;
            }

            let before = self.item_top(0);
            self.ring.rotate_right(1);
            let after = self.item_top(1);
            let shift = after - before;

            *physical += shift;
            self.stack.pop();
            pass.effects.push(RecycleEffect::MovedToHead(entry.item));
        }
    }

    /// Unwind every move and compensate the total shift in one step.
    ///
    /// Called on resize and on motion-preference changes.
    pub fn reset(&mut self) -> RecyclePass {
        let mut pass = RecyclePass::default();
        let gap = self.gap();
        while let Some(entry) = self.stack.pop() {
            self.ring.rotate_right(1);
            let measured = self
                .ring
                .front()
                .and_then(|item| ready_extent(item.height))
                .map_or(entry.shift_amount, |h| h + gap);
            pass.scroll_delta += measured;
            pass.effects.push(RecycleEffect::MovedToHead(entry.item));
        }
        if !pass.is_empty() {
            debug!(
                target: "drift.recycle",
                moves = pass.effects.len(),
                scroll_delta = pass.scroll_delta,
                "recycling reset"
            );
        }
        pass
    }

    /// Total compensation currently applied.
    #[must_use]
    pub fn cumulative_shift(&self) -> f64 {
        self.stack.last().map_or(0.0, |e| e.cumulative_threshold)
    }

    /// Position the viewport would have if nothing had moved.
    #[must_use]
    pub fn virtual_position(&self, physical: f64) -> f64 {
        physical + self.cumulative_shift()
    }

    /// Item ids in current ring (render) order.
    pub fn order(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.ring.iter().map(|item| item.id)
    }

    /// Render step: document y of each item in ring order.
    #[must_use]
    pub fn layout(&self) -> Vec<(ItemId, f64)> {
        let gap = self.gap();
        let mut y = self.list_top;
        self.ring
            .iter()
            .map(|item| {
                let top = y;
                y += ready_extent(item.height).unwrap_or(0.0) + gap;
                (item.id, top)
            })
            .collect()
    }

    #[must_use]
    pub fn stack(&self) -> &[RecycleEntry] {
        &self.stack
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[must_use]
    pub const fn config(&self) -> &RecycleConfig {
        &self.config
    }
}
