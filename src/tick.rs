//! Wires the pedal controller, all pad controllers, the crosstalk arbiter,
//! and the event emitter together into the single per-tick pass. This is
//! the only place that knows the full fixed pad-index order and the
//! concrete channel-to-pad wiring from `config::DEFAULT_PADS`.

use crate::arbiter::CrosstalkArbiter;
use crate::config::{GainTrimOverlay, Tunables, CLASSIFIER, DEFAULT_PADS, NUM_PADS};
use crate::event::{EventEmitter, MidiSink};
use crate::pad::{PadContext, PadController};
use crate::pedal::PedalController;
use crate::sensor::{PedalInput, SensorSampler};

/// Owns one [`PadController`] per physical pad plus the process-wide
/// collaborators (arbiter, emitter, pedal, config overlay) and drives one
/// tick across all of them in fixed index order.
pub struct TickDriver {
    pads: [PadController; NUM_PADS],
    pedal: PedalController,
    arbiter: CrosstalkArbiter,
    emitter: EventEmitter,
    overlay: GainTrimOverlay,
}

impl TickDriver {
    pub fn new() -> Self {
        let pads = core::array::from_fn(|i| PadController::new(i, DEFAULT_PADS[i]));
        Self {
            pads,
            pedal: PedalController::new(),
            arbiter: CrosstalkArbiter::new(),
            emitter: EventEmitter::new(),
            overlay: GainTrimOverlay::new(),
        }
    }

    #[inline]
    pub fn overlay(&self) -> &GainTrimOverlay {
        &self.overlay
    }

    /// Advance every controller by exactly one tick (pedal first, then pads
    /// in index order). `sensors` is queried once per pad, using
    /// the channel indices from that pad's compiled-in config, and once for
    /// the pedal's digital input.
    pub fn tick<S: MidiSink>(
        &mut self,
        now: u32,
        sensors: &mut impl SensorSampler,
        pedal_input: &mut impl PedalInput,
        sink: &mut S,
        tunables: &Tunables,
    ) {
        self.pedal
            .tick(pedal_input.read(), &mut self.emitter, sink);

        for pad in self.pads.iter_mut() {
            let config = DEFAULT_PADS[pad.pad_index()];
            let primary = sensors.read(config.channel);
            let secondary = config.secondary_channel.map(|ch| sensors.read(ch));

            let mut ctx = PadContext {
                overlay: &self.overlay,
                tunables,
                classifier: &CLASSIFIER,
                arbiter: &self.arbiter,
                emitter: &mut self.emitter,
                sink,
                pedal_closed: self.pedal.is_closed(),
            };
            pad.tick(now, primary, secondary, &mut ctx);
        }
    }
}

impl Default for TickDriver {
    fn default() -> Self {
        Self::new()
    }
}
