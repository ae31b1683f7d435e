//! Logical voice identifiers (note numbers on the wire) and the "is this
//! voice currently sounding" bookkeeping. Kept centralized here and
//! consulted only by the event emitter, updated centrally there instead of
//! sprinkled through pad code.

/// A logical output voice: one sound in the receiving sampler, addressed by
/// MIDI note number on channel 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum Voice {
    Kick = 0,
    FloorTom = 1,
    Tom1 = 2,
    Tom2 = 3,
    SnareHead = 4,
    SnareRim = 5,
    Rimshot = 6,
    RideBow = 7,
    RideBell = 8,
    CrashBow = 9,
    CrashBell = 10,
    HiHatClosed = 11,
    HiHatOpen = 12,
    HiHatPedal = 13,
}

/// Total number of distinct voices, for sizing [`VoiceTable`].
pub const NUM_VOICES: usize = 14;

impl Voice {
    /// Default MIDI note number for this voice.
    #[inline]
    pub const fn note(self) -> u8 {
        match self {
            Voice::Kick => 36,
            Voice::FloorTom => 41,
            Voice::Tom1 => 43,
            Voice::Tom2 => 45,
            Voice::SnareHead => 38,
            Voice::SnareRim => 39,
            Voice::Rimshot => 40,
            Voice::RideBow => 50,
            Voice::RideBell => 53,
            Voice::CrashBow => 49,
            Voice::CrashBell => 51,
            Voice::HiHatClosed => 42,
            Voice::HiHatOpen => 46,
            Voice::HiHatPedal => 44,
        }
    }
}

/// Tracks, per logical voice, whether a note-on has not yet been matched by
/// a note-off.
#[derive(Clone, Copy, Debug)]
pub struct VoiceTable {
    playing: [bool; NUM_VOICES],
}

impl VoiceTable {
    pub const fn new() -> Self {
        Self {
            playing: [false; NUM_VOICES],
        }
    }

    #[inline]
    pub fn is_playing(&self, voice: Voice) -> bool {
        self.playing[voice as usize]
    }

    #[inline]
    pub fn set_playing(&mut self, voice: Voice, playing: bool) {
        self.playing[voice as usize] = playing;
    }
}

impl Default for VoiceTable {
    fn default() -> Self {
        Self::new()
    }
}
