//! # Configuration Management
//!
//! This module loads the optional `clock-config.toml` file. Every field has
//! a default matching the stock wiring (DIO on GPIO 252, CLK on GPIO 253,
//! full brightness, 0.75 s refresh), so the clock runs with no file at all.

use crate::clock::DEFAULT_REFRESH_MS;
use crate::gpio_sysfs::SYSFS_GPIO_ROOT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "clock-config.toml";

pub const DEFAULT_DIO_PIN: u32 = 252;
pub const DEFAULT_CLK_PIN: u32 = 253;
pub const DEFAULT_BRIGHTNESS: u8 = 7;
pub const DEFAULT_GPIO_CHIP: &str = "/dev/gpiochip0";

/// Application configuration loaded from clock-config.toml
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// GPIO line numbers
    pub pins: PinConfig,
    /// How the lines are reached
    pub gpio: GpioConfig,
    /// Brightness and refresh period
    pub display: DisplayConfig,
}

/// GPIO lines the module is wired to
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PinConfig {
    /// Data line, as in /sys/class/gpio/gpioN
    pub dio: u32,
    /// Clock line, as in /sys/class/gpio/gpioN
    pub clk: u32,
}

/// Which kernel interface drives the lines
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// /sys/class/gpio attribute files
    Sysfs,
    /// /dev/gpiochipN character device (needs the `hardware` feature)
    Cdev,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GpioConfig {
    pub backend: Backend,
    /// Root of the sysfs GPIO class
    pub sysfs_root: PathBuf,
    /// Character device used by the cdev backend
    pub chip: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// 0 (dimmest) to 7 (brightest)
    pub brightness: u8,
    /// Time between refreshes in milliseconds
    pub refresh_ms: u32,
}

impl Default for PinConfig {
    fn default() -> Self {
        PinConfig {
            dio: DEFAULT_DIO_PIN,
            clk: DEFAULT_CLK_PIN,
        }
    }
}

impl Default for GpioConfig {
    fn default() -> Self {
        GpioConfig {
            backend: Backend::Sysfs,
            sysfs_root: PathBuf::from(SYSFS_GPIO_ROOT),
            chip: PathBuf::from(DEFAULT_GPIO_CHIP),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            brightness: DEFAULT_BRIGHTNESS,
            refresh_ms: DEFAULT_REFRESH_MS,
        }
    }
}

impl Config {
    /// Load configuration from clock-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    log::info!(
                        "Loaded configuration from {}: DIO={} CLK={}",
                        path.as_ref().display(),
                        config.pins.dio,
                        config.pins.clk
                    );
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config file format: {}", e);
                    log::warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config file found, using default configuration");
                Self::default()
            }
        }
    }
}
