//! Hi-hat pedal edge detection and the open/closed/chick voice coupling.
//! A plain level read, compared against the last reading, fires the
//! pedal-chick note and any necessary note-offs only on change.

use crate::event::{EventEmitter, MidiSink};
use crate::voice::Voice;

/// Fixed velocity for the pedal-chick note.
const PEDAL_CHICK_VELOCITY: u8 = 30;

/// Tracks the hi-hat pedal's open/closed level and fires the edge-triggered
/// events: pedal chick on close, and the note-off for whichever cymbal
/// voice was left sounding across the transition.
pub struct PedalController {
    closed: bool,
}

impl PedalController {
    pub const fn new() -> Self {
        Self { closed: false }
    }

    /// Current level: `true` while pressed (closed).
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Advance by one tick. `reading` is the raw pedal pin level passed
    /// through unchanged: `true` = high = released, `false` = low = pressed,
    /// matching the polarity `sensor::PedalInput` returns.
    pub fn tick<S: MidiSink>(&mut self, reading: bool, emitter: &mut EventEmitter, sink: &mut S) {
        let closed = !reading;
        if closed == self.closed {
            return;
        }
        self.closed = closed;

        if closed {
            if emitter.is_playing(Voice::HiHatOpen) {
                emitter.note_off(sink, Voice::HiHatOpen);
            }
            emitter.note_on(sink, Voice::HiHatPedal, PEDAL_CHICK_VELOCITY);
        } else if emitter.is_playing(Voice::HiHatClosed) {
            emitter.note_off(sink, Voice::HiHatClosed);
        }
    }
}

impl Default for PedalController {
    fn default() -> Self {
        Self::new()
    }
}

/// Fire a hi-hat pad hit as closed or open depending on the pedal's current
/// level, retiring whichever voice was left sounding on the other side.
pub fn fire_hihat_hit<S: MidiSink>(
    pedal_closed: bool,
    velocity: u8,
    emitter: &mut EventEmitter,
    sink: &mut S,
) {
    if pedal_closed {
        emitter.note_on(sink, Voice::HiHatClosed, velocity);
        if emitter.is_playing(Voice::HiHatOpen) {
            emitter.note_off(sink, Voice::HiHatOpen);
        }
    } else {
        emitter.note_on(sink, Voice::HiHatOpen, velocity);
        if emitter.is_playing(Voice::HiHatClosed) {
            emitter.note_off(sink, Voice::HiHatClosed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn closing_pedal_fires_chick() {
        let mut pedal = PedalController::new();
        let mut emitter = EventEmitter::new();
        let mut sink = RecordingSink::new();

        pedal.tick(false, &mut emitter, &mut sink);
        assert!(pedal.is_closed());
        assert_eq!(sink.frames, vec![[0x90, Voice::HiHatPedal.note(), PEDAL_CHICK_VELOCITY]]);
    }

    #[test]
    fn closing_pedal_silences_open_hihat() {
        let mut pedal = PedalController::new();
        let mut emitter = EventEmitter::new();
        let mut sink = RecordingSink::new();
        emitter.note_on(&mut sink, Voice::HiHatOpen, 90);
        sink.frames.clear();

        pedal.tick(false, &mut emitter, &mut sink);
        assert_eq!(sink.frames[0], [0x80, Voice::HiHatOpen.note(), 0]);
        assert_eq!(sink.frames[1], [0x90, Voice::HiHatPedal.note(), PEDAL_CHICK_VELOCITY]);
    }

    #[test]
    fn opening_pedal_silences_closed_hihat() {
        let mut pedal = PedalController::new();
        let mut emitter = EventEmitter::new();
        let mut sink = RecordingSink::new();
        pedal.tick(false, &mut emitter, &mut sink);
        emitter.note_on(&mut sink, Voice::HiHatClosed, 80);
        sink.frames.clear();

        pedal.tick(true, &mut emitter, &mut sink);
        assert!(!pedal.is_closed());
        assert_eq!(sink.frames, vec![[0x80, Voice::HiHatClosed.note(), 0]]);
    }

    #[test]
    fn steady_reading_is_a_no_op() {
        let mut pedal = PedalController::new();
        let mut emitter = EventEmitter::new();
        let mut sink = RecordingSink::new();

        pedal.tick(true, &mut emitter, &mut sink);
        assert!(sink.frames.is_empty());
        pedal.tick(true, &mut emitter, &mut sink);
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn hit_while_closed_plays_closed_voice() {
        let mut emitter = EventEmitter::new();
        let mut sink = RecordingSink::new();
        fire_hihat_hit(true, 100, &mut emitter, &mut sink);
        assert_eq!(sink.frames, vec![[0x90, Voice::HiHatClosed.note(), 100]]);
    }

    #[test]
    fn hit_while_open_retires_closed_voice() {
        let mut emitter = EventEmitter::new();
        let mut sink = RecordingSink::new();
        fire_hihat_hit(true, 100, &mut emitter, &mut sink);
        sink.frames.clear();
        fire_hihat_hit(false, 90, &mut emitter, &mut sink);
        assert_eq!(
            sink.frames,
            vec![[0x90, Voice::HiHatOpen.note(), 90], [0x80, Voice::HiHatClosed.note(), 0]]
        );
    }
}
