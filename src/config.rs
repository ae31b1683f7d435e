//! Immutable pad/tunable tables plus a small atomics-backed runtime overlay
//! for the handful of values a performer plausibly wants to trim (per-pad
//! gain and threshold).
//!
//! `DEFAULT_PADS`, `TUNABLES`, and `CLASSIFIER` are the single source of
//! truth, assembled once at startup and never mutated. `GainTrimOverlay` is
//! the only mutable configuration surface: atomics-backed so the tick loop
//! never locks to read it, and deliberately small, no NVS, no console, no
//! filesystem, since persistence is out of scope for this firmware.

use core::sync::atomic::{AtomicU16, AtomicU32, Ordering};

use crate::voice::Voice;

/// Number of physical pads (not analog channels: dual-zone pads own two
/// channels but count as one pad).
pub const NUM_PADS: usize = 8;

/// Pad role, used only by the dual-zone classifier and the crosstalk
/// arbiter's kick exclusion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadRole {
    Generic,
    HiHat,
    Snare,
    Ride,
    Crash,
}

/// Immutable, per-pad configuration.
///
/// Dual-zone pads populate `secondary_*`; simple pads leave them at the
/// defaults (`secondary_channel: None` is the discriminant other code reads).
#[derive(Clone, Copy, Debug)]
pub struct PadConfig {
    pub role: PadRole,
    pub is_dual_zone: bool,

    pub channel: u8,
    pub threshold: u16,
    pub retrigger_ceiling: u16,
    pub gain: f32,
    pub voice: Voice,

    pub secondary_channel: Option<u8>,
    pub secondary_threshold: u16,
    pub secondary_retrigger_ceiling: u16,
    pub secondary_gain: f32,
    pub secondary_voice: Voice,
}

impl PadConfig {
    const fn simple(
        role: PadRole,
        channel: u8,
        threshold: u16,
        retrigger_ceiling: u16,
        gain: f32,
        voice: Voice,
    ) -> Self {
        Self {
            role,
            is_dual_zone: false,
            channel,
            threshold,
            retrigger_ceiling,
            gain,
            voice,
            secondary_channel: None,
            secondary_threshold: 0,
            secondary_retrigger_ceiling: 0,
            secondary_gain: 0.0,
            secondary_voice: voice,
        }
    }

    #[allow(clippy::too_many_arguments)]
    const fn dual_zone(
        role: PadRole,
        channel: u8,
        threshold: u16,
        retrigger_ceiling: u16,
        gain: f32,
        voice: Voice,
        secondary_channel: u8,
        secondary_threshold: u16,
        secondary_retrigger_ceiling: u16,
        secondary_gain: f32,
        secondary_voice: Voice,
    ) -> Self {
        Self {
            role,
            is_dual_zone: true,
            channel,
            threshold,
            retrigger_ceiling,
            gain,
            voice,
            secondary_channel: Some(secondary_channel),
            secondary_threshold,
            secondary_retrigger_ceiling,
            secondary_gain,
            secondary_voice,
        }
    }
}

/// Pad index constants, in tick-driver order.
pub const PAD_KICK: usize = 0;
pub const PAD_FLOOR_TOM: usize = 1;
pub const PAD_TOM1: usize = 2;
pub const PAD_TOM2: usize = 3;
pub const PAD_HIHAT: usize = 4;
pub const PAD_SNARE: usize = 5;
pub const PAD_RIDE: usize = 6;
pub const PAD_CRASH: usize = 7;

/// Default per-pad configuration table.
pub static DEFAULT_PADS: [PadConfig; NUM_PADS] = [
    PadConfig::simple(PadRole::Generic, 0, 120, 900, 1.0, Voice::Kick),
    PadConfig::simple(PadRole::Generic, 1, 45, 950, 1.0, Voice::FloorTom),
    PadConfig::simple(PadRole::Generic, 2, 230, 950, 1.0, Voice::Tom1),
    PadConfig::simple(PadRole::Generic, 3, 150, 950, 1.0, Voice::Tom2),
    // Hi-hat's base voice is closed; the pedal coupling in `pedal.rs` decides
    // closed vs. open at fire time.
    PadConfig::simple(PadRole::HiHat, 4, 80, 900, 1.0, Voice::HiHatClosed),
    PadConfig::dual_zone(
        PadRole::Snare,
        5,
        55,
        550,
        1.0,
        Voice::SnareHead,
        6,
        40,
        100,
        1.0,
        Voice::SnareRim,
    ),
    PadConfig::dual_zone(
        PadRole::Ride,
        7,
        35,
        950,
        1.0,
        Voice::RideBow,
        8,
        35,
        950,
        7.0,
        Voice::RideBell,
    ),
    PadConfig::dual_zone(
        PadRole::Crash,
        9,
        35,
        680,
        1.0,
        Voice::CrashBow,
        10,
        35,
        680,
        1.2,
        Voice::CrashBell,
    ),
];

/// Process-wide, immutable timing and velocity tunables.
#[derive(Clone, Copy, Debug)]
pub struct Tunables {
    pub peak_window_ms: u32,
    pub silent_debounce_ms: u32,
    pub repique_window_ms: u32,
    pub choke_confirm_ms: u32,
    pub crosstalk_window_ms: u32,
    pub high_velocity: u8,
    pub low_velocity_discard: u8,
    pub min_velocity: u8,
    pub max_velocity: u8,
    pub retrigger_min_multiplier: f32,
}

pub const TUNABLES: Tunables = Tunables {
    peak_window_ms: 7,
    silent_debounce_ms: 30,
    repique_window_ms: 180,
    choke_confirm_ms: 20,
    crosstalk_window_ms: 130,
    high_velocity: 115,
    low_velocity_discard: 29,
    min_velocity: 10,
    max_velocity: 127,
    retrigger_min_multiplier: 1.5,
};

/// Dual-zone classifier design constants. Intentionally not exposed as
/// performer tunables; surfaced in a struct only so tests can override
/// them, production code always uses [`CLASSIFIER`].
#[derive(Clone, Copy, Debug)]
pub struct ClassifierConstants {
    pub rimshot_primary_floor: u16,
    pub dual_zone_ceiling: u16,
    pub rim_dominance: f32,
    pub choke_ratio: f32,
    pub choke_absolute_floor: u16,
}

pub const CLASSIFIER: ClassifierConstants = ClassifierConstants {
    rimshot_primary_floor: 600,
    dual_zone_ceiling: 1000,
    rim_dominance: 1.1,
    choke_ratio: 0.05,
    choke_absolute_floor: 20,
};

/// Runtime-mutable overlay on top of [`DEFAULT_PADS`]: per-pad gain and
/// threshold trim, stored as fixed-point atomics (gain × 1000, threshold in
/// raw 10-bit units). A value of `0` means "no override, use the default":
/// there is no separate "is set" flag, keeping the hot-path read a single
/// relaxed load per field.
///
/// This is the entire runtime configuration surface for this firmware:
/// no persistence, no console, no network.
pub struct GainTrimOverlay {
    gain_milli: [AtomicU32; NUM_PADS],
    threshold: [AtomicU16; NUM_PADS],
}

impl GainTrimOverlay {
    pub const fn new() -> Self {
        const ZERO_U32: AtomicU32 = AtomicU32::new(0);
        const ZERO_U16: AtomicU16 = AtomicU16::new(0);
        Self {
            gain_milli: [ZERO_U32; NUM_PADS],
            threshold: [ZERO_U16; NUM_PADS],
        }
    }

    /// Effective gain for `pad_index`: the overlay value if set, else the
    /// compiled-in default from `DEFAULT_PADS`.
    #[inline]
    pub fn gain(&self, pad_index: usize) -> f32 {
        let milli = self.gain_milli[pad_index].load(Ordering::Relaxed);
        if milli == 0 {
            DEFAULT_PADS[pad_index].gain
        } else {
            milli as f32 / 1000.0
        }
    }

    /// Effective primary threshold for `pad_index`.
    #[inline]
    pub fn threshold(&self, pad_index: usize) -> u16 {
        let overridden = self.threshold[pad_index].load(Ordering::Relaxed);
        if overridden == 0 {
            DEFAULT_PADS[pad_index].threshold
        } else {
            overridden
        }
    }

    /// Set a runtime gain trim. `gain <= 0.0` clears the override.
    #[inline]
    pub fn set_gain(&self, pad_index: usize, gain: f32) {
        let milli = if gain <= 0.0 { 0 } else { (gain * 1000.0) as u32 };
        self.gain_milli[pad_index].store(milli, Ordering::Relaxed);
    }

    /// Set a runtime threshold trim. `0` clears the override.
    #[inline]
    pub fn set_threshold(&self, pad_index: usize, threshold: u16) {
        self.threshold[pad_index].store(threshold, Ordering::Relaxed);
    }
}

impl Default for GainTrimOverlay {
    fn default() -> Self {
        Self::new()
    }
}
