//! # Pin I/O Abstraction
//!
//! The protocol driver never touches hardware directly. It goes through
//! [`PinIo`], which models a GPIO line the way the Linux GPIO surface does:
//! a numbered line that is exported once, given a direction, and then read
//! or written many times.
//!
//! Implementations:
//! - [`crate::gpio_sysfs::SysfsGpio`]: `/sys/class/gpio` files (default)
//! - `crate::gpio_cdev::CdevGpio`: `/dev/gpiochipN` (`hardware` feature)
//! - a recording mock in the test tree

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Numeric GPIO line identifier, as in `/sys/class/gpio/gpioN`.
pub type PinId = u32;

/// Line direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    /// The string the sysfs `direction` attribute accepts.
    pub fn as_sysfs(self) -> &'static str {
        match self {
            Direction::Input => "in",
            Direction::Output => "out",
        }
    }
}

/// Logic level of a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Level of the least significant bit of `byte`.
    pub fn from_lsb(byte: u8) -> Self {
        if byte & 0x01 == 0 {
            Level::Low
        } else {
            Level::High
        }
    }

    pub fn is_low(self) -> bool {
        self == Level::Low
    }

    /// Raw line value, `0` or `1`.
    pub fn as_bit(self) -> u8 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Errors from the pin I/O layer.
///
/// Every variant means the hardware link is unusable; callers are not
/// expected to recover, only to report.
#[derive(Error, Debug)]
pub enum GpioError {
    /// The export endpoint could not be opened
    #[error("failed to open gpio export {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A direction or value file could not be opened
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The write or read call itself failed
    #[error("I/O on {} failed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Fewer bytes were written than the command holds
    #[error("short write to {}: wrote {written} of {expected} bytes", path.display())]
    ShortWrite {
        path: PathBuf,
        expected: usize,
        written: usize,
    },

    /// The value file returned no data
    #[error("failed to read from {}: no data", path.display())]
    EmptyRead { path: PathBuf },

    /// The value file did not start with an integer
    #[error("failed to parse pin data {contents:?} from {}", path.display())]
    Parse { path: PathBuf, contents: String },

    /// The GPIO character device could not be opened
    #[cfg(feature = "hardware")]
    #[error("failed to open gpio chip {}: {source}", path.display())]
    Chip {
        path: PathBuf,
        #[source]
        source: linux_embedded_hal::gpio_cdev::Error,
    },

    /// A line request or line operation on the character device failed
    #[cfg(feature = "hardware")]
    #[error("gpio line {pin}: {source}")]
    Cdev {
        pin: PinId,
        #[source]
        source: linux_embedded_hal::gpio_cdev::Error,
    },

    /// A line was used before being exported
    #[cfg(feature = "hardware")]
    #[error("gpio line {pin} has not been exported")]
    NotExported { pin: PinId },
}

/// A set of GPIO lines addressed by number.
pub trait PinIo {
    /// Register `pin` with the platform so it can be configured.
    fn export(&mut self, pin: PinId) -> Result<(), GpioError>;

    /// Switch `pin` between input and output.
    fn set_direction(&mut self, pin: PinId, direction: Direction) -> Result<(), GpioError>;

    /// Drive `pin` to `level`.
    fn write(&mut self, pin: PinId, level: Level) -> Result<(), GpioError>;

    /// Sample the current level of `pin`.
    fn read(&mut self, pin: PinId) -> Result<Level, GpioError>;
}
