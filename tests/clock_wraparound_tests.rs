//! Confirms the pad state machine's timeouts stay correct across a single
//! wrap of the millisecond counter: all elapsed-time predicates use wrapping
//! subtraction, never an absolute-time comparison.

use drum_module_firmware::arbiter::CrosstalkArbiter;
use drum_module_firmware::clock::elapsed_ms;
use drum_module_firmware::config::{DEFAULT_PADS, GainTrimOverlay, CLASSIFIER, PAD_KICK, TUNABLES};
use drum_module_firmware::event::EventEmitter;
use drum_module_firmware::{MidiSink, PadContext, PadController, PadState};

struct RecordingSink {
    frames: Vec<[u8; 3]>,
}

impl RecordingSink {
    fn new() -> Self {
        Self { frames: Vec::new() }
    }
}

impl MidiSink for RecordingSink {
    fn send(&mut self, bytes: [u8; 3]) {
        self.frames.push(bytes);
    }
}

#[test]
fn elapsed_ms_is_correct_across_a_wrap() {
    let since = u32::MAX - 2;
    let now = 5u32;
    // 3 ms to reach u32::MAX, then 5 more past the wrap = 8.
    assert_eq!(elapsed_ms(now, since), 8);
}

#[test]
fn pad_peak_window_resolves_correctly_straddling_a_clock_wrap() {
    let overlay = GainTrimOverlay::new();
    let arbiter = CrosstalkArbiter::new();
    let mut emitter = EventEmitter::new();
    let mut sink = RecordingSink::new();
    let mut pad = PadController::new(PAD_KICK, DEFAULT_PADS[PAD_KICK]);

    let onset_time = u32::MAX - 3;
    let mut now = onset_time;
    loop {
        let mut ctx = PadContext {
            overlay: &overlay,
            tunables: &TUNABLES,
            classifier: &CLASSIFIER,
            arbiter: &arbiter,
            emitter: &mut emitter,
            sink: &mut sink,
            pedal_closed: false,
        };
        pad.tick(now, 300, None, &mut ctx); // threshold 120
        if pad.state() == PadState::SilentDebounce {
            break;
        }
        now = now.wrapping_add(1);
    }

    // The peak window (7ms) must have resolved despite straddling the
    // u32 wrap, and exactly one note-on must have fired.
    assert_eq!(sink.frames.len(), 1);
    assert_eq!(sink.frames[0][1], 36);
}
