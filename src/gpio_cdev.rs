// Character-device GPIO backend, built with the `hardware` feature.

use crate::pin::{Direction, GpioError, Level, PinId, PinIo};
use linux_embedded_hal::gpio_cdev::{Chip, LineHandle, LineRequestFlags};
use std::collections::HashMap;
use std::path::Path;

const CONSUMER: &str = "led-clock";

/// Level a line is driven to when it becomes an output, as sysfs `"out"` does.
const OUTPUT_DEFAULT: Level = Level::Low;

/// A held line and the direction it was requested with.
struct Line {
    handle: LineHandle,
    direction: Direction,
}

/// Lines requested from one `/dev/gpiochipN`.
///
/// The character device has no separate direction switch, so changing
/// direction releases the line and requests it again with new flags. A line
/// that already has the wanted direction is left alone.
pub struct CdevGpio {
    chip: Chip,
    lines: HashMap<PinId, Line>,
}

/// Flags and initial value for a fresh request in `direction`.
fn request_args(direction: Direction) -> (LineRequestFlags, u8) {
    match direction {
        Direction::Input => (LineRequestFlags::INPUT, 0),
        Direction::Output => (LineRequestFlags::OUTPUT, OUTPUT_DEFAULT.as_bit()),
    }
}

/// Whether a line held in `current` must be requested again for `wanted`.
fn needs_request(current: Option<Direction>, wanted: Direction) -> bool {
    current != Some(wanted)
}

impl CdevGpio {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GpioError> {
        let path = path.as_ref();
        let chip = Chip::new(path).map_err(|source| GpioError::Chip {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            chip,
            lines: HashMap::new(),
        })
    }

    fn current_direction(&self, pin: PinId) -> Option<Direction> {
        self.lines.get(&pin).map(|line| line.direction)
    }

    fn request(&mut self, pin: PinId, direction: Direction) -> Result<(), GpioError> {
        // Only one handle per line may be open at a time
        self.lines.remove(&pin);

        let (flags, default) = request_args(direction);
        let handle = self
            .chip
            .get_line(pin)
            .and_then(|line| line.request(flags, default, CONSUMER))
            .map_err(|source| GpioError::Cdev { pin, source })?;

        self.lines.insert(pin, Line { handle, direction });
        Ok(())
    }

    fn handle(&self, pin: PinId) -> Result<&LineHandle, GpioError> {
        self.lines
            .get(&pin)
            .map(|line| &line.handle)
            .ok_or(GpioError::NotExported { pin })
    }
}

impl PinIo for CdevGpio {
    fn export(&mut self, pin: PinId) -> Result<(), GpioError> {
        if self.lines.contains_key(&pin) {
            return Ok(());
        }
        self.request(pin, Direction::Input)
    }

    fn set_direction(&mut self, pin: PinId, direction: Direction) -> Result<(), GpioError> {
        if !needs_request(self.current_direction(pin), direction) {
            return Ok(());
        }
        log::trace!("GPIO {} re-requested as {:?}", pin, direction);
        self.request(pin, direction)
    }

    fn write(&mut self, pin: PinId, level: Level) -> Result<(), GpioError> {
        self.handle(pin)?
            .set_value(level.as_bit())
            .map_err(|source| GpioError::Cdev { pin, source })
    }

    fn read(&mut self, pin: PinId) -> Result<Level, GpioError> {
        let value = self
            .handle(pin)?
            .get_value()
            .map_err(|source| GpioError::Cdev { pin, source })?;
        Ok(Level::from(value != 0))
    }
}
