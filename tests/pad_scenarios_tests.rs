//! End-to-end scenario tests driving [`TickDriver`] the way the tick loop
//! would, covering the concrete clock-driven scenarios from the hit-detection
//! specification: crosstalk suppression across pads, and the full
//! snare-pad lifecycle (hit, debounce, rejected retrigger, valid repique).

use drum_module_firmware::event::MidiSink;
use drum_module_firmware::sensor::{PedalInput, SensorSampler};
use drum_module_firmware::tick::TickDriver;
use drum_module_firmware::TUNABLES;

struct FixedSensors {
    readings: [u16; 11],
}

impl SensorSampler for FixedSensors {
    fn read(&mut self, channel: u8) -> u16 {
        self.readings[channel as usize]
    }
}

struct ReleasedPedal;

impl PedalInput for ReleasedPedal {
    fn read(&mut self) -> bool {
        true
    }
}

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

fn readings(overrides: &[(u8, u16)]) -> [u16; 11] {
    let mut r = [0u16; 11];
    for &(ch, v) in overrides {
        r[ch as usize] = v;
    }
    r
}

/// Scenario: kick fires loud but never arms the crosstalk window (note
/// number 36, excluded); a separate pad firing loud arms it; a third pad's
/// weak hit inside the window is discarded as crosstalk.
#[test]
fn crosstalk_window_armed_by_snare_discards_weak_tom_hit() {
    let mut driver = TickDriver::new();
    let mut pedal = ReleasedPedal;
    let mut sink = RecordingSink::new();

    // Kick fires loud at t=0..7 (channel 0, threshold 120).
    for t in 0..=7u32 {
        let mut sensors = FixedSensors {
            readings: readings(&[(0, 1023)]),
        };
        driver.tick(t, &mut sensors, &mut pedal, &mut sink, &TUNABLES);
    }
    assert_eq!(sink.frames.len(), 1);
    assert_eq!(sink.frames[0][1], 36); // kick note

    // Snare head fires loud at t=20..27 (channel 5, threshold 55), arming
    // the crosstalk window.
    for t in 20..=27u32 {
        let mut sensors = FixedSensors {
            readings: readings(&[(5, 1000)]),
        };
        driver.tick(t, &mut sensors, &mut pedal, &mut sink, &TUNABLES);
    }
    assert_eq!(sink.frames.len(), 2);

    // Tom1 (channel 2, threshold 230) produces a weak peak inside the
    // 130ms crosstalk window opened at t=27ish; it must be discarded.
    for t in 60..=67u32 {
        let mut sensors = FixedSensors {
            readings: readings(&[(2, 245)]), // just above threshold, low velocity
        };
        driver.tick(t, &mut sensors, &mut pedal, &mut sink, &TUNABLES);
    }
    // No third frame: the weak tom hit was discarded as crosstalk.
    assert_eq!(sink.frames.len(), 2);
}

/// Full snare lifecycle: a hit fires, a retrigger during SILENT_DEBOUNCE is
/// ignored entirely, and a later strong reading deep into REPIQUE_CHECK's
/// decay restarts peak detection and eventually fires a second note.
#[test]
fn snare_hit_then_rejected_retrigger_then_valid_repique() {
    let mut driver = TickDriver::new();
    let mut pedal = ReleasedPedal;
    let mut sink = RecordingSink::new();

    for t in 0..=7u32 {
        let mut sensors = FixedSensors {
            readings: readings(&[(5, 300), (6, 0)]),
        };
        driver.tick(t, &mut sensors, &mut pedal, &mut sink, &TUNABLES);
    }
    assert_eq!(sink.frames.len(), 1);

    // t=15: still inside SILENT_DEBOUNCE (ends at t=7+30=37). Ignored.
    let mut sensors = FixedSensors {
        readings: readings(&[(5, 300), (6, 0)]),
    };
    driver.tick(15, &mut sensors, &mut pedal, &mut sink, &TUNABLES);
    assert_eq!(sink.frames.len(), 1);

    // t=50: SILENT_DEBOUNCE ends (elapsed since t=7 is 43 >= 30), entering
    // REPIQUE_CHECK with a fresh entry time; this tick only transitions.
    let mut sensors = FixedSensors {
        readings: readings(&[(5, 300), (6, 0)]),
    };
    driver.tick(50, &mut sensors, &mut pedal, &mut sink, &TUNABLES);
    assert_eq!(sink.frames.len(), 1);

    // t=51: one ms into REPIQUE_CHECK, a reading of 100 is well below the
    // still-high decayed threshold and must not retrigger.
    let mut sensors = FixedSensors {
        readings: readings(&[(5, 100), (6, 0)]),
    };
    driver.tick(51, &mut sensors, &mut pedal, &mut sink, &TUNABLES);
    assert_eq!(sink.frames.len(), 1);

    // t=140: deep into the decay, a strong reading exceeds the now-lower
    // decayed threshold and restarts peak detection, eventually firing a
    // second note once the new peak window resolves.
    for t in 140..=147u32 {
        let mut sensors = FixedSensors {
            readings: readings(&[(5, 300), (6, 0)]),
        };
        driver.tick(t, &mut sensors, &mut pedal, &mut sink, &TUNABLES);
    }
    assert_eq!(sink.frames.len(), 2);
}

/// Hi-hat pedal and pad coupling driven end-to-end: closing the pedal fires
/// a chick, and a subsequent pad hit plays the closed voice and (if it had
/// been left sounding) retires the open voice.
#[test]
fn hihat_pedal_close_then_pad_hit_plays_closed_voice() {
    let mut driver = TickDriver::new();
    let mut sink = RecordingSink::new();

    struct PressedPedal;
    impl PedalInput for PressedPedal {
        fn read(&mut self) -> bool {
            false // pressed = closed
        }
    }
    let mut pedal = PressedPedal;

    let mut sensors = FixedSensors { readings: [0; 11] };
    driver.tick(0, &mut sensors, &mut pedal, &mut sink, &TUNABLES);
    assert_eq!(sink.frames.len(), 1);
    assert_eq!(sink.frames[0][0], 0x90); // pedal-chick note-on

    // Hi-hat pad (channel 4, threshold 80) fires while pedal is closed.
    for t in 1..=8u32 {
        let mut sensors = FixedSensors {
            readings: readings(&[(4, 300)]),
        };
        driver.tick(t, &mut sensors, &mut pedal, &mut sink, &TUNABLES);
    }
    assert_eq!(sink.frames.len(), 2);
    assert_eq!(sink.frames[1][1], 42); // closed hi-hat note
}
