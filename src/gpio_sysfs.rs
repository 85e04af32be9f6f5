//! # Sysfs GPIO Backend
//!
//! Drives lines through the legacy `/sys/class/gpio` interface:
//!
//! - `<root>/export` takes a line number and creates `<root>/gpioN/`
//! - `<root>/gpioN/direction` takes `in` or `out`
//! - `<root>/gpioN/value` takes `0`/`1` and reads back the current level
//!
//! Every call opens the attribute, does one read or write, and closes it.
//! Nothing is cached, so the files always reflect the line state.

use crate::pin::{Direction, GpioError, Level, PinId, PinIo};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Default location of the sysfs GPIO class.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// GPIO lines exposed under a sysfs class directory.
#[derive(Debug, Clone)]
pub struct SysfsGpio {
    root: PathBuf,
}

impl SysfsGpio {
    /// Lines under `root`, normally [`SYSFS_GPIO_ROOT`] (tests point this at
    /// a temp dir).
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn attribute(&self, pin: PinId, name: &str) -> PathBuf {
        self.root.join(format!("gpio{pin}")).join(name)
    }

    /// Write `command` in a single call; anything less than the whole
    /// command is a failure.
    fn write_command(path: &Path, command: &str) -> Result<(), GpioError> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|source| GpioError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let written = file
            .write(command.as_bytes())
            .map_err(|source| GpioError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        if written != command.len() {
            return Err(GpioError::ShortWrite {
                path: path.to_path_buf(),
                expected: command.len(),
                written,
            });
        }
        Ok(())
    }
}

impl PinIo for SysfsGpio {
    fn export(&mut self, pin: PinId) -> Result<(), GpioError> {
        let path = self.root.join("export");
        let mut file = OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(|source| GpioError::Export {
                path: path.clone(),
                source,
            })?;

        // The kernel rejects a second export with EBUSY; the line is usable
        // either way.
        if let Err(e) = file.write_all(format!("{pin}\n").as_bytes()) {
            log::debug!("export of GPIO {} not accepted ({}), continuing", pin, e);
        }
        Ok(())
    }

    fn set_direction(&mut self, pin: PinId, direction: Direction) -> Result<(), GpioError> {
        Self::write_command(&self.attribute(pin, "direction"), direction.as_sysfs())
    }

    fn write(&mut self, pin: PinId, level: Level) -> Result<(), GpioError> {
        let command = match level {
            Level::Low => "0\n",
            Level::High => "1\n",
        };
        Self::write_command(&self.attribute(pin, "value"), command)
    }

    fn read(&mut self, pin: PinId) -> Result<Level, GpioError> {
        let path = self.attribute(pin, "value");
        let mut file = File::open(&path).map_err(|source| GpioError::Open {
            path: path.clone(),
            source,
        })?;

        let mut buf = [0u8; 80];
        let count = file.read(&mut buf).map_err(|source| GpioError::Io {
            path: path.clone(),
            source,
        })?;
        if count == 0 {
            return Err(GpioError::EmptyRead { path });
        }

        let text = String::from_utf8_lossy(&buf[..count]);
        let value = leading_integer(&text).ok_or_else(|| GpioError::Parse {
            path: path.clone(),
            contents: text.trim().to_string(),
        })?;

        Ok(Level::from(value != 0))
    }
}

/// Optional sign and digits at the start of `text` after whitespace.
/// Whatever follows the digits is ignored.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let sign = usize::from(text.starts_with(['+', '-']));
    let digits = text[sign..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    text[..sign + digits].parse().ok()
}
