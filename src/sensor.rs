//! The out-of-scope hardware input seams. Concrete ADC polling and GPIO
//! debounce timing live behind `hal::gpio`; the tick driver only ever talks
//! to these traits, never to `esp-idf-hal` directly.

/// Reads one of the eleven analog piezo channels.
pub trait SensorSampler {
    /// Read `channel` (0..=10). Returns a 10-bit reading, `0..=1023`.
    fn read(&mut self, channel: u8) -> u16;
}

/// Reads the hi-hat pedal's digital input.
///
/// The pin is pulled high when released; `read()` returns that raw level.
/// `true` = high = released (open), `false` = low = pressed (closed).
pub trait PedalInput {
    fn read(&mut self) -> bool;
}
