//! GPIO/ADC HAL for the piezo sensor channels and the hi-hat pedal input.

// TODO: Implement with esp-idf-hal::adc and esp-idf-hal::gpio

/// Analog pin assignment for the eleven piezo channels.
pub struct SensorPins {
    pub channel_pins: [i32; 11],
}

/// Digital pin configuration for the hi-hat pedal (pulled high when released).
pub struct PedalPinConfig {
    pub pin: i32,
    pub active_low: bool,
}
