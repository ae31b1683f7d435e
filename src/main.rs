//! drum-module-firmware - Main entry point
//!
//! This is a placeholder. The actual implementation will:
//! 1. Initialize hardware (ADC channels for the eleven piezo pads, the
//!    hi-hat pedal GPIO, and the MIDI UART transceiver)
//! 2. Run the tick driver in a tight loop on the RT core
//! 3. Drain the diagnostic log at leisure from the idle loop

#![no_std]
#![no_main]

use esp_idf_svc::sys as esp_idf_sys;

use drum_module_firmware::event::MidiSink;
use drum_module_firmware::fault::{FaultCode, FaultState};
use drum_module_firmware::logging::{DiagLog, LogLevel};
use drum_module_firmware::sensor::{PedalInput, SensorSampler};
use drum_module_firmware::tick::TickDriver;
use drum_module_firmware::{rt_error, TUNABLES};

static FAULT_STATE: FaultState = FaultState::new();
static RT_LOG: DiagLog = DiagLog::new();

#[no_mangle]
fn main() {
    // Initialize ESP-IDF
    esp_idf_sys::link_patches();

    // Initialize logger so we can see output
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("========================================");
    log::info!("drum-module-firmware - Starting up!");
    log::info!("========================================");

    // TODO: Initialize hardware
    // - ADC channels 0..10 for the eleven piezo pads
    // - GPIO for the hi-hat pedal (pulled high when released)
    // - UART for the MIDI transceiver (31,250 baud, 8-N-1)

    log::info!("Entering main loop...");

    rt_task();
}

/// RT task: the tick driver's home. Must complete one pass well under the
/// 7ms peak-capture window. No blocking calls, no allocation, no logging on
/// the hot path except `rt_log!`/`rt_error!`, which are non-blocking and
/// drop-on-full.
#[allow(dead_code)]
fn rt_task() -> ! {
    let mut driver = TickDriver::new();
    let mut sensors = BoardSensors;
    let mut pedal = BoardPedal;
    let mut sink = BoardMidiSink;

    loop {
        let now = timestamp_ms();

        driver.tick(now, &mut sensors, &mut pedal, &mut sink, &TUNABLES);

        if FAULT_STATE.is_active() {
            rt_error!(&RT_LOG, now, "fault: {:?} data={}", FAULT_STATE.code(), FAULT_STATE.data());
            FAULT_STATE.clear();
        }

        drain_log();
        delay_until_next_tick();
    }
}

/// Drain at most one pending diagnostic entry per tick, off the hot path's
/// critical timing but still inside the same loop: this firmware has no
/// second core to hand the ring to.
#[allow(dead_code)]
fn drain_log() {
    if let Some(entry) = RT_LOG.drain() {
        let msg = core::str::from_utf8(&entry.msg[..entry.len as usize]).unwrap_or("<invalid utf8>");
        match entry.level {
            LogLevel::Error => log::error!("[{}] {}", entry.timestamp_ms, msg),
            LogLevel::Warn => log::warn!("[{}] {}", entry.timestamp_ms, msg),
            LogLevel::Info => log::info!("[{}] {}", entry.timestamp_ms, msg),
            LogLevel::Debug => log::debug!("[{}] {}", entry.timestamp_ms, msg),
        }
    }
}

// --- Placeholder HAL bindings (to be implemented on hal::gpio/hal::serial) ---

struct BoardSensors;

impl SensorSampler for BoardSensors {
    fn read(&mut self, _channel: u8) -> u16 {
        // TODO: Read the ADC channel via hal::gpio::SensorPins.
        FAULT_STATE.set(FaultCode::SensorReadError, _channel as u32);
        0
    }
}

struct BoardPedal;

impl PedalInput for BoardPedal {
    fn read(&mut self) -> bool {
        // TODO: Read the hi-hat pedal GPIO via hal::gpio::PedalPinConfig.
        true
    }
}

struct BoardMidiSink;

impl MidiSink for BoardMidiSink {
    fn send(&mut self, _bytes: [u8; 3]) {
        // TODO: Write three bytes via hal::serial::MidiUartConfig. If the
        // transceiver cannot accept them, the frame is dropped rather than
        // stalling the tick.
    }
}

#[allow(dead_code)]
fn timestamp_ms() -> u32 {
    (unsafe { esp_idf_sys::esp_timer_get_time() } / 1000) as u32
}

#[allow(dead_code)]
fn delay_until_next_tick() {
    // TODO: Precise sub-millisecond timing with a hardware timer; the loop
    // must complete well under the 7ms peak-capture window.
    unsafe {
        esp_idf_sys::vTaskDelay(1);
    }
}
