//! # LED Clock Entry Point
//!
//! Loads the optional config, brings up the two GPIO lines, blanks the
//! module and then refreshes the time forever. Any GPIO failure ends the
//! process with a non-zero status and the error chain on stderr.

use anyhow::Context;
use led_clock_lib::config::{Backend, Config};
use led_clock_lib::delay::SleepDelay;
use led_clock_lib::gpio_sysfs::SysfsGpio;
use led_clock_lib::{Brightness, Clock, LocalClock, PinIo, Tm1637};

/// Bring up the display on `io` and run the clock loop.
fn run_clock<P: PinIo>(io: P, config: &Config) -> anyhow::Result<()> {
    let brightness = Brightness::new(config.display.brightness)
        .context("invalid brightness in configuration")?;

    let mut display = Tm1637::new(io, SleepDelay, config.pins.dio, config.pins.clk)
        .with_brightness(brightness);

    display.init().with_context(|| {
        format!(
            "failed to set up GPIO {} (DIO) and GPIO {} (CLK)",
            config.pins.dio, config.pins.clk
        )
    })?;
    display.clear().context("failed to blank the display")?;

    let mut clock = Clock::new(display, LocalClock, config.display.refresh_ms);
    let never = clock.run().context("display refresh failed")?;
    match never {}
}

#[cfg(feature = "hardware")]
fn run_cdev(config: &Config) -> anyhow::Result<()> {
    use led_clock_lib::gpio_cdev::CdevGpio;

    let io = CdevGpio::open(&config.gpio.chip)
        .with_context(|| format!("failed to open {}", config.gpio.chip.display()))?;
    run_clock(io, config)
}

#[cfg(not(feature = "hardware"))]
fn run_cdev(_config: &Config) -> anyhow::Result<()> {
    Err(anyhow::anyhow!(
        "the cdev GPIO backend is not built in; rebuild with --features hardware"
    ))
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load();
    log::info!(
        "GPIO backend {:?}, DIO={} CLK={}, brightness {}",
        config.gpio.backend,
        config.pins.dio,
        config.pins.clk,
        config.display.brightness
    );

    match config.gpio.backend {
        Backend::Sysfs => run_clock(SysfsGpio::with_root(&config.gpio.sysfs_root), &config),
        Backend::Cdev => run_cdev(&config),
    }
}
