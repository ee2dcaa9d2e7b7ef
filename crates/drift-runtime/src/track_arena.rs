#![forbid(unsafe_code)]

//! Arena of marquee tracks keyed by stable integer ids.
//!
//! Strips are created when a project row initializes and dropped when the
//! row leaves the document. Ids are never reused, so a stale id held by a
//! host element simply misses.

use drift_core::config::MarqueeConfig;

use crate::marquee::{MarqueeTrack, TrackMode};

/// Stable identifier of a marquee track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(u32);

impl TrackId {
    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// One translation produced by a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackTranslation {
    pub track: TrackId,
    pub offset: f64,
}

/// Slot-indexed storage for [`MarqueeTrack`]s.
#[derive(Debug, Clone, Default)]
pub struct TrackArena {
    slots: Vec<Option<MarqueeTrack>>,
    live: usize,
    reduce_motion: bool,
}

impl TrackArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a track. It inherits the arena's reduce-motion preference.
    pub fn insert(&mut self, mut track: MarqueeTrack) -> TrackId {
        track.set_reduce_motion(self.reduce_motion);
        let id = TrackId(u32::try_from(self.slots.len()).unwrap_or(u32::MAX));
        self.slots.push(Some(track));
        self.live += 1;
        id
    }

    /// Insert a track for `row` built from `config`.
    pub fn insert_row(&mut self, config: &MarqueeConfig, row: usize) -> TrackId {
        self.insert(MarqueeTrack::for_row(config, row))
    }

    /// Remove a track.
    pub fn remove(&mut self, id: TrackId) -> Option<MarqueeTrack> {
        let removed = self.slots.get_mut(id.0 as usize)?.take();
        if removed.is_some() {
            self.live -= 1;
        }
        removed
    }

    #[must_use]
    pub fn get(&self, id: TrackId) -> Option<&MarqueeTrack> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: TrackId) -> Option<&mut MarqueeTrack> {
        self.slots.get_mut(id.0 as usize)?.as_mut()
    }

    /// Number of live tracks.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live tracks in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (TrackId, &MarqueeTrack)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|t| (TrackId(i as u32), t)))
    }

    /// Advance every track by one frame and collect the translations.
    ///
    /// Tracks that are not measured yet still report their (zero) offset so
    /// the host resets any stale transform.
    pub fn tick_all(&mut self, delta_seconds: f64) -> Vec<TrackTranslation> {
        let mut out = Vec::with_capacity(self.live);
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if let Some(track) = slot {
                out.push(TrackTranslation {
                    track: TrackId(i as u32),
                    offset: track.tick(delta_seconds),
                });
            }
        }
        out
    }

    /// Broadcast the reduce-motion preference to every track.
    pub fn set_reduce_motion(&mut self, reduce_motion: bool) {
        self.reduce_motion = reduce_motion;
        for track in self.slots.iter_mut().flatten() {
            track.set_reduce_motion(reduce_motion);
        }
    }

    #[must_use]
    pub const fn reduce_motion(&self) -> bool {
        self.reduce_motion
    }

    /// Set the mode of one track. Returns `true` if it changed.
    pub fn set_mode(&mut self, id: TrackId, mode: TrackMode) -> bool {
        self.get_mut(id).is_some_and(|t| t.set_mode(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_across_removal() {
        let config = MarqueeConfig::default();
        let mut arena = TrackArena::new();
        let a = arena.insert_row(&config, 0);
        let b = arena.insert_row(&config, 1);
        assert!(arena.remove(a).is_some());
        assert!(arena.remove(a).is_none());
        assert!(arena.get(a).is_none());
        assert!(arena.get(b).is_some());
        let c = arena.insert_row(&config, 2);
        assert_ne!(c, a);
        assert_eq!(arena.len(), 2);
        let ids: Vec<TrackId> = arena.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![b, c]);
    }

    #[test]
    fn tick_all_reports_every_live_track() {
        let config = MarqueeConfig::default();
        let mut arena = TrackArena::new();
        let a = arena.insert_row(&config, 0);
        let b = arena.insert_row(&config, 1);
        assert!(arena.get_mut(a).is_some_and(|t| t.compute_metrics(600.0)));
        let out = arena.tick_all(1.0);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], TrackTranslation { track: a, offset: -25.0 });
        assert_eq!(out[1], TrackTranslation { track: b, offset: 0.0 });
    }

    #[test]
    fn reduce_motion_broadcast_and_inherited() {
        let config = MarqueeConfig::default();
        let mut arena = TrackArena::new();
        let a = arena.insert_row(&config, 0);
        arena.set_reduce_motion(true);
        let b = arena.insert_row(&config, 1);
        assert!(arena.get(a).is_some_and(MarqueeTrack::reduce_motion));
        assert!(arena.get(b).is_some_and(MarqueeTrack::reduce_motion));
    }

    #[test]
    fn set_mode_on_missing_track_is_false() {
        let mut arena = TrackArena::new();
        let a = arena.insert_row(&MarqueeConfig::default(), 0);
        arena.remove(a);
        assert!(!arena.set_mode(a, TrackMode::FastLeft));
    }
}
