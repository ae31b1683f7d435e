//! The single place that turns a logical (voice, velocity) pair into a wire
//! frame and updates the sounding-voice bookkeeping. Keeps the "is playing"
//! flags centralized here instead of duplicated per call site.

use crate::voice::{Voice, VoiceTable};

/// MIDI channel this firmware always writes to.
pub const CHANNEL: u8 = 0;

/// The out-of-scope wire transport: anything that can accept three bytes.
/// Concrete UART/serial bring-up lives in `hal::serial`.
///
/// If the sink cannot accept the bytes the frame is dropped, not retried
/// and not blocked on; implementations should never panic or busy-wait
/// inside `send`.
pub trait MidiSink {
    fn send(&mut self, bytes: [u8; 3]);
}

/// Converts logical events into wire frames and tracks which voices are
/// currently sounding.
pub struct EventEmitter {
    voices: VoiceTable,
}

impl EventEmitter {
    pub const fn new() -> Self {
        Self {
            voices: VoiceTable::new(),
        }
    }

    #[inline]
    pub fn is_playing(&self, voice: Voice) -> bool {
        self.voices.is_playing(voice)
    }

    /// Emit a note-on. Always sets `playing[voice] := true`, even if a note
    /// was already sounding on this voice (re-strike supersedes, no implicit
    /// note-off is inserted for the superseded note).
    #[inline]
    pub fn note_on(&mut self, sink: &mut impl MidiSink, voice: Voice, velocity: u8) {
        sink.send([0x90 | CHANNEL, voice.note(), velocity]);
        self.voices.set_playing(voice, true);
    }

    /// Emit a note-off. Idempotent: emitting a note-off for a voice that is
    /// already silent still writes the frame, and the table correctly stays
    /// `false`.
    #[inline]
    pub fn note_off(&mut self, sink: &mut impl MidiSink, voice: Voice) {
        sink.send([0x80 | CHANNEL, voice.note(), 0]);
        self.voices.set_playing(voice, false);
    }

    /// Seed `playing` state without going through the wire, for tests that
    /// need to exercise choke/retire logic starting from a sounding voice.
    #[cfg(test)]
    pub(crate) fn set_playing_for_test(&mut self, voice: Voice, playing: bool) {
        self.voices.set_playing(voice, playing);
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
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
    fn note_on_sets_playing_and_emits_frame() {
        let mut emitter = EventEmitter::new();
        let mut sink = RecordingSink::new();
        emitter.note_on(&mut sink, Voice::SnareHead, 48);
        assert_eq!(sink.frames, vec![[0x90, 38, 48]]);
        assert!(emitter.is_playing(Voice::SnareHead));
    }

    #[test]
    fn note_off_clears_playing_and_is_idempotent() {
        let mut emitter = EventEmitter::new();
        let mut sink = RecordingSink::new();
        emitter.note_off(&mut sink, Voice::RideBow);
        assert_eq!(sink.frames, vec![[0x80, 50, 0]]);
        assert!(!emitter.is_playing(Voice::RideBow));

        emitter.note_off(&mut sink, Voice::RideBow);
        assert_eq!(sink.frames.len(), 2);
        assert!(!emitter.is_playing(Voice::RideBow));
    }

    #[test]
    fn restrike_supersedes_without_implicit_note_off() {
        let mut emitter = EventEmitter::new();
        let mut sink = RecordingSink::new();
        emitter.note_on(&mut sink, Voice::Kick, 100);
        emitter.note_on(&mut sink, Voice::Kick, 110);
        assert_eq!(sink.frames, vec![[0x90, 36, 100], [0x90, 36, 110]]);
        assert!(emitter.is_playing(Voice::Kick));
    }
}
