//! Rampart - TMC5130 bring-up firmware
//!
//! Brings a single TMC5130 up over SPI0 of an RP2040, applies the embedded
//! `machine.toml` and runs an out-and-back jog cycle through the chip's
//! ramp generator.
//!
//! Wiring (SPI0): SCK=GPIO18, MOSI=GPIO19, MISO=GPIO16, CSN=GPIO17.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::spi::Spi;
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

use rampart_core::config::{parse_machine_config, MachineConfig};
use rampart_drivers::stepper::Tmc5130;
use rampart_hal::gpio::ChipSelectPolarity;
use rampart_hal::spi::Mode;
use rampart_hal_rp2040::delay::BlockingDelay;
use rampart_hal_rp2040::gpio::ChipSelectPin;
use rampart_hal_rp2040::spi::Rp2040SpiBus;
use rampart_hal_rp2040::{ChipSelectTransport, SpiConfig};

mod channels;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit machine.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../machine.toml");

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Rampart firmware starting...");

    let p = embassy_rp::init(Default::default());
    let config = load_config();
    let spi = config.driver.spi;

    // build.rs rejects bad modes, fall back to the chip's mode anyway
    let mode = Mode::from_number(spi.mode).unwrap_or(Mode::Mode3);
    let spi_config = SpiConfig::new(spi.frequency_hz, mode).with_cs_setup_us(spi.cs_setup_us);

    let bus = Spi::new_blocking(
        p.SPI0,
        p.PIN_18,
        p.PIN_19,
        p.PIN_16,
        Rp2040SpiBus::embassy_config(&spi_config),
    );
    let cs = ChipSelectPin::new(p.PIN_17, ChipSelectPolarity::ActiveLow);
    let transport = ChipSelectTransport::with_delay(
        Rp2040SpiBus::new(bus),
        cs,
        BlockingDelay,
        spi_config,
    );
    info!("SPI0 initialized at {} Hz, mode {}", spi.frequency_hz, spi.mode);

    let mut driver = Tmc5130::with_profile(transport, config.driver.motion);
    if let Err(e) = driver.begin() {
        error!("TMC5130 bring-up failed: {}", e);
        halt().await;
    }
    if let Err(e) = driver.apply_config(&config.driver) {
        error!("Applying driver configuration failed: {}", e);
        halt().await;
    }
    if let Some(status) = driver.last_status() {
        if status.reset_flag {
            debug!("Chip reports a reset since the last GSTAT read");
        }
    }
    info!("TMC5130 configured: {}", config.driver);

    spawner.spawn(tasks::motion_task(driver)).unwrap();
    spawner.spawn(tasks::jog_cycle_task(config.cycle)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// Parse the embedded configuration
///
/// Falls back to built-in defaults if parsing fails, which only happens when
/// build-time validation was bypassed.
fn load_config() -> MachineConfig {
    match parse_machine_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            warn!("Using built-in defaults");
            MachineConfig::default()
        }
    }
}

/// Park the main task after a fatal error
async fn halt() -> ! {
    loop {
        Timer::after_secs(60).await;
        trace!("Halted");
    }
}
