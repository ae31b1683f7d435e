//! The single process-wide crosstalk gate.
//!
//! A `Sync`, atomics-backed, `const fn`-constructible struct exposing
//! exactly two operations. This keeps pad controllers pure functions of
//! `(state, readings, now, arbiter)`: the arbiter is consulted, never
//! reached into.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::Tunables;

/// Tracks the timestamp of the last high-velocity hit (on any pad but the
/// kick) and answers whether a weak hit should be discarded as crosstalk.
pub struct CrosstalkArbiter {
    last_high_velocity_ms: AtomicU32,
}

impl CrosstalkArbiter {
    pub const fn new() -> Self {
        Self {
            last_high_velocity_ms: AtomicU32::new(0),
        }
    }

    /// Should a hit with this velocity, arriving `now`, be discarded as
    /// crosstalk? True only while inside the crosstalk window opened by a
    /// prior high-velocity hit.
    #[inline]
    pub fn should_discard(&self, velocity: u8, now: u32, tunables: &Tunables) -> bool {
        if velocity >= tunables.low_velocity_discard {
            return false;
        }
        let last = self.last_high_velocity_ms.load(Ordering::Relaxed);
        crate::clock::elapsed_ms(now, last) < tunables.crosstalk_window_ms
    }

    /// Record that a hit fired. Arms the crosstalk window only if the
    /// velocity is high and the firing voice is not the kick (primary
    /// note number greater than 36, the kick's own note).
    #[inline]
    pub fn observe(&self, velocity: u8, note_number: u8, now: u32, tunables: &Tunables) {
        if velocity > tunables.high_velocity && note_number > 36 {
            self.last_high_velocity_ms.store(now, Ordering::Relaxed);
        }
    }
}

impl Default for CrosstalkArbiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TUNABLES;

    #[test]
    fn discards_weak_hit_inside_window() {
        let arbiter = CrosstalkArbiter::new();
        arbiter.observe(120, 38, 20, &TUNABLES);
        assert!(arbiter.should_discard(15, 60, &TUNABLES));
    }

    #[test]
    fn does_not_discard_after_window_closes() {
        let arbiter = CrosstalkArbiter::new();
        arbiter.observe(120, 38, 20, &TUNABLES);
        assert!(!arbiter.should_discard(15, 20 + TUNABLES.crosstalk_window_ms, &TUNABLES));
    }

    #[test]
    fn does_not_discard_strong_hit() {
        let arbiter = CrosstalkArbiter::new();
        arbiter.observe(120, 38, 20, &TUNABLES);
        assert!(!arbiter.should_discard(TUNABLES.low_velocity_discard, 25, &TUNABLES));
    }

    #[test]
    fn kick_never_arms_the_window() {
        let arbiter = CrosstalkArbiter::new();
        arbiter.observe(125, 36, 0, &TUNABLES);
        assert!(!arbiter.should_discard(5, 10, &TUNABLES));
    }
}
