//! UART HAL for the MIDI transceiver (31,250 baud, 8-N-1).

// TODO: Implement with esp-idf-hal::uart

/// UART pin/baud configuration for the MIDI output line.
pub struct MidiUartConfig {
    pub tx_pin: i32,
    pub baud_rate: u32,
}

impl MidiUartConfig {
    pub const MIDI_BAUD_RATE: u32 = 31_250;
}
