//! The per-pad hit-detection state machine: onset, peak capture, retrigger
//! rejection, crosstalk filtering, dual-zone classification, and cymbal
//! choke detection. This is the heart of the firmware.
//!
//! One [`PadController`] per physical pad, not per channel: a dual-zone pad
//! owns two channel indices and two peak registers, and runs as a single
//! state machine rather than two independent ones. The FSM idiom, an enum
//! state, a `tick(now, ...)` entry point that is a pure function of
//! `(state, inputs, now)`, private `tick_<state>` helpers, keeps the whole
//! thing host-testable without any hardware behind it.

use crate::arbiter::CrosstalkArbiter;
use crate::clock::elapsed_ms;
use crate::config::{ClassifierConstants, GainTrimOverlay, PadConfig, PadRole, Tunables};
use crate::event::{EventEmitter, MidiSink};
use crate::velocity::compute_velocity;
use crate::voice::Voice;

/// Pad FSM state: always one of these five.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadState {
    Idle,
    PeakDetect,
    SilentDebounce,
    RepiqueCheck,
    ChokeConfirm,
}

/// Shared collaborators a pad needs for one tick: the runtime gain/threshold
/// overlay, the immutable tunables and classifier constants, the process-
/// wide crosstalk arbiter, the event emitter, and the wire sink. Bundled so
/// `PadController::tick`'s signature stays manageable; nothing here is
/// pad-specific.
pub struct PadContext<'a, S: MidiSink> {
    pub overlay: &'a GainTrimOverlay,
    pub tunables: &'a Tunables,
    pub classifier: &'a ClassifierConstants,
    pub arbiter: &'a CrosstalkArbiter,
    pub emitter: &'a mut EventEmitter,
    pub sink: &'a mut S,
    /// Only consulted for the hi-hat pad; ignored otherwise.
    pub pedal_closed: bool,
}

/// One physical pad's hit-detection state machine.
pub struct PadController {
    pad_index: usize,
    config: PadConfig,

    state: PadState,
    state_entry_time: u32,
    peak_primary: u16,
    peak_secondary: u16,
    retrigger_initial: u16,
}

impl PadController {
    pub fn new(pad_index: usize, config: PadConfig) -> Self {
        Self {
            pad_index,
            config,
            state: PadState::Idle,
            state_entry_time: 0,
            peak_primary: 0,
            peak_secondary: 0,
            retrigger_initial: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> PadState {
        self.state
    }

    #[inline]
    pub fn pad_index(&self) -> usize {
        self.pad_index
    }

    /// Advance the state machine by one tick.
    ///
    /// `secondary_reading` must be `Some` for dual-zone pads and is ignored
    /// for simple pads.
    pub fn tick<S: MidiSink>(
        &mut self,
        now: u32,
        primary_reading: u16,
        secondary_reading: Option<u16>,
        ctx: &mut PadContext<'_, S>,
    ) {
        // Defensive invariant restore: only ride/crash ever reach ChokeConfirm.
        if self.state == PadState::ChokeConfirm && self.config.role != PadRole::Ride && self.config.role != PadRole::Crash
        {
            self.state = PadState::Idle;
            self.peak_primary = 0;
            self.peak_secondary = 0;
        }

        match self.state {
            PadState::Idle => self.tick_idle(now, primary_reading, secondary_reading, ctx.overlay),
            PadState::PeakDetect => {
                self.tick_peak_detect(now, primary_reading, secondary_reading, ctx)
            }
            PadState::SilentDebounce => self.tick_silent_debounce(now, ctx.tunables),
            PadState::RepiqueCheck => {
                self.tick_repique_check(now, primary_reading, secondary_reading, ctx)
            }
            PadState::ChokeConfirm => {
                self.tick_choke_confirm(now, primary_reading, secondary_reading, ctx)
            }
        }
    }

    fn threshold(&self, overlay: &GainTrimOverlay) -> u16 {
        overlay.threshold(self.pad_index)
    }

    fn gain(&self, overlay: &GainTrimOverlay) -> f32 {
        overlay.gain(self.pad_index)
    }

    fn enter_peak_detect(&mut self, now: u32, primary_reading: u16, secondary_reading: Option<u16>) {
        self.peak_primary = primary_reading;
        self.peak_secondary = secondary_reading.unwrap_or(0);
        self.state = PadState::PeakDetect;
        self.state_entry_time = now;
    }

    fn tick_idle(
        &mut self,
        now: u32,
        primary_reading: u16,
        secondary_reading: Option<u16>,
        overlay: &GainTrimOverlay,
    ) {
        let threshold = self.threshold(overlay);
        let onset = primary_reading > threshold
            || secondary_reading.is_some_and(|s| s > self.config.secondary_threshold);
        if onset {
            self.enter_peak_detect(now, primary_reading, secondary_reading);
        }
    }

    fn tick_peak_detect<S: MidiSink>(
        &mut self,
        now: u32,
        primary_reading: u16,
        secondary_reading: Option<u16>,
        ctx: &mut PadContext<'_, S>,
    ) {
        if elapsed_ms(now, self.state_entry_time) < ctx.tunables.peak_window_ms {
            if self.peak_primary < primary_reading {
                self.peak_primary = primary_reading;
            }
            if let Some(s) = secondary_reading {
                if self.peak_secondary < s {
                    self.peak_secondary = s;
                }
            }
            return;
        }

        let threshold = self.threshold(ctx.overlay);
        let above = self.peak_primary > threshold
            || (self.config.is_dual_zone && self.peak_secondary > self.config.secondary_threshold);
        if !above {
            self.state = PadState::Idle;
            return;
        }

        self.resolve_hit(now, ctx);
    }

    fn tick_silent_debounce(&mut self, now: u32, tunables: &Tunables) {
        // Readings are ignored entirely while debouncing.
        if elapsed_ms(now, self.state_entry_time) >= tunables.silent_debounce_ms {
            self.state = PadState::RepiqueCheck;
            self.state_entry_time = now;
        }
    }

    fn tick_repique_check<S: MidiSink>(
        &mut self,
        now: u32,
        primary_reading: u16,
        secondary_reading: Option<u16>,
        ctx: &mut PadContext<'_, S>,
    ) {
        let tunables = ctx.tunables;
        let elapsed = elapsed_ms(now, self.state_entry_time);
        if elapsed >= tunables.repique_window_ms {
            self.state = PadState::Idle;
            return;
        }

        let threshold = self.threshold(ctx.overlay);
        let decayed =
            decayed_retrigger_threshold(elapsed, self.retrigger_initial, threshold, tunables);

        let candidate = match secondary_reading {
            Some(s) => primary_reading.max(s),
            None => primary_reading,
        };

        if candidate > decayed {
            self.enter_peak_detect(now, primary_reading, secondary_reading);
        }
    }

    fn tick_choke_confirm<S: MidiSink>(
        &mut self,
        now: u32,
        primary_reading: u16,
        secondary_reading: Option<u16>,
        ctx: &mut PadContext<'_, S>,
    ) {
        if self.peak_primary < primary_reading {
            self.peak_primary = primary_reading;
        }
        if let Some(s) = secondary_reading {
            if self.peak_secondary < s {
                self.peak_secondary = s;
            }
        }

        if elapsed_ms(now, self.state_entry_time) < ctx.tunables.choke_confirm_ms {
            return;
        }

        let choke_confirmed = (self.peak_secondary as f32)
            < (self.peak_primary as f32) * ctx.classifier.choke_ratio
            || self.peak_secondary < ctx.classifier.choke_absolute_floor;

        if choke_confirmed {
            self.emit_choke_note_offs(ctx);
            self.state = PadState::Idle;
            self.peak_primary = 0;
            self.peak_secondary = 0;
            return;
        }

        let threshold = self.threshold(ctx.overlay);
        if self.peak_primary > threshold || self.peak_secondary > self.config.secondary_threshold {
            self.state = PadState::PeakDetect;
            self.state_entry_time = now;
        } else {
            self.state = PadState::Idle;
            self.peak_primary = 0;
            self.peak_secondary = 0;
        }
    }

    /// Resolve a validated peak-detect window: compute velocities, apply the
    /// crosstalk gate, classify (dual-zone) or emit (simple), and transition
    /// onward. Called only once peak > threshold has been established.
    fn resolve_hit<S: MidiSink>(&mut self, now: u32, ctx: &mut PadContext<'_, S>) {
        let threshold = self.threshold(ctx.overlay);
        let gain = self.gain(ctx.overlay);
        let velocity_primary = compute_velocity(self.peak_primary, gain, threshold, ctx.tunables);
        let velocity_secondary = if self.config.is_dual_zone {
            compute_velocity(
                self.peak_secondary,
                self.config.secondary_gain,
                self.config.secondary_threshold,
                ctx.tunables,
            )
        } else {
            0
        };

        let loudest = if self.config.is_dual_zone {
            velocity_primary.max(velocity_secondary)
        } else {
            velocity_primary
        };

        if ctx.arbiter.should_discard(loudest, now, ctx.tunables) {
            self.state = PadState::Idle;
            self.peak_primary = 0;
            self.peak_secondary = 0;
            return;
        }

        let mut entered_choke = false;

        if self.config.is_dual_zone {
            entered_choke = self.classify_and_emit_dual_zone(now, velocity_primary, velocity_secondary, ctx);
        } else {
            self.emit_simple(velocity_primary, ctx);
        }

        ctx.arbiter
            .observe(loudest, self.config.voice.note(), now, ctx.tunables);

        let max_peak = if self.config.is_dual_zone {
            self.peak_primary.max(self.peak_secondary)
        } else {
            self.peak_primary
        };
        self.retrigger_initial = retrigger_initial(
            max_peak,
            threshold,
            self.config.retrigger_ceiling,
            ctx.tunables,
        );

        if !entered_choke {
            self.state = PadState::SilentDebounce;
            self.state_entry_time = now;
        }
    }

    fn emit_simple<S: MidiSink>(&mut self, velocity: u8, ctx: &mut PadContext<'_, S>) {
        if self.config.role == PadRole::HiHat {
            crate::pedal::fire_hihat_hit(ctx.pedal_closed, velocity, ctx.emitter, ctx.sink);
        } else {
            ctx.emitter.note_on(ctx.sink, self.config.voice, velocity);
        }
    }

    /// Returns `true` if this resolution transitioned into `ChokeConfirm`
    /// (so the caller must not also transition to `SilentDebounce`).
    fn classify_and_emit_dual_zone<S: MidiSink>(
        &mut self,
        now: u32,
        velocity_primary: u8,
        velocity_secondary: u8,
        ctx: &mut PadContext<'_, S>,
    ) -> bool {
        let pp = self.peak_primary;
        let ps = self.peak_secondary;
        let c = ctx.classifier;

        match self.config.role {
            PadRole::Snare => {
                if pp > c.rimshot_primary_floor && (ps as u32) > 2 * self.config.secondary_threshold as u32 {
                    ctx.emitter
                        .note_on(ctx.sink, Voice::Rimshot, velocity_primary.max(velocity_secondary));
                } else if pp < c.dual_zone_ceiling && (ps as f32) * c.rim_dominance > pp as f32 {
                    ctx.emitter.note_on(ctx.sink, self.config.secondary_voice, velocity_secondary);
                } else {
                    ctx.emitter.note_on(ctx.sink, self.config.voice, velocity_primary);
                }
                false
            }
            PadRole::Ride | PadRole::Crash => {
                if pp < c.dual_zone_ceiling && ps > pp {
                    ctx.emitter.note_on(ctx.sink, self.config.secondary_voice, velocity_secondary);
                    false
                } else if (ps as f32) < (pp as f32) * c.choke_ratio {
                    self.emit_choke_note_offs(ctx);
                    // With `legacy-choke-fallthrough` this reproduces the commented-out
                    // transition in the source snapshot: the two note-offs fire but the
                    // pad falls through to SILENT_DEBOUNCE instead of confirming the choke.
                    if cfg!(feature = "legacy-choke-fallthrough") {
                        false
                    } else {
                        self.state_entry_time = now;
                        self.state = PadState::ChokeConfirm;
                        true
                    }
                } else {
                    ctx.emitter.note_on(ctx.sink, self.config.voice, velocity_primary);
                    false
                }
            }
            PadRole::Generic | PadRole::HiHat => {
                // Unreachable: only Snare/Ride/Crash are ever configured dual-zone.
                ctx.emitter.note_on(ctx.sink, self.config.voice, velocity_primary);
                false
            }
        }
    }

    fn emit_choke_note_offs<S: MidiSink>(&mut self, ctx: &mut PadContext<'_, S>) {
        ctx.emitter.note_off(ctx.sink, self.config.voice);
        ctx.emitter.note_off(ctx.sink, self.config.secondary_voice);
    }
}

/// Linearly decay the retrigger threshold from `retrigger_initial` toward
/// `threshold` over `repique_window_ms`, floored at `threshold *
/// retrigger_min_multiplier`.
fn decayed_retrigger_threshold(
    elapsed_ms: u32,
    retrigger_initial: u16,
    threshold: u16,
    tunables: &Tunables,
) -> u16 {
    let lerp = retrigger_initial as i32
        + (threshold as i32 - retrigger_initial as i32) * elapsed_ms as i32
            / tunables.repique_window_ms as i32;
    let floor = (threshold as f32 * tunables.retrigger_min_multiplier).ceil() as i32;
    lerp.max(floor) as u16
}

/// Capture the seed for the next `REPIQUE_CHECK` decay.
fn retrigger_initial(
    max_peak_this_hit: u16,
    threshold: u16,
    retrigger_ceiling: u16,
    tunables: &Tunables,
) -> u16 {
    let seed = retrigger_ceiling.min(
        (max_peak_this_hit as f32 * tunables.retrigger_min_multiplier).floor() as u16,
    );
    let floor = (threshold as f32 * tunables.retrigger_min_multiplier).ceil() as u16;
    floor.max(seed)
}
