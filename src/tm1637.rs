//! TM1637 2-wire LED controller driver
//!
//! The TM1637 speaks an I2C-like protocol without addresses. A transaction
//! is framed by a start condition (DIO falls while CLK is high) and a stop
//! condition (DIO rises while CLK is high). Bytes go out LSB first, one bit
//! per CLK rising edge, and after every byte the controller pulls DIO low
//! for one clock as an acknowledgment.
//!
//! Writing one cell takes three transactions:
//!
//! 1. data command (fixed or auto-increment addressing)
//! 2. address command `0xC0 | cell`, followed by the segment data
//! 3. display control `0x88 + brightness`

use crate::pin::{Direction, GpioError, Level, PinId, PinIo};
use embedded_hal::delay::DelayNs;
use thiserror::Error;

/// Data command: write display memory with auto-incrementing address.
pub const AUTO_ADDR: u8 = 0x40;
/// Data command: write display memory at a fixed address.
pub const FIXED_ADDR: u8 = 0x44;
/// Address command base; the cell index is OR-ed in.
pub const START_ADDR: u8 = 0xC0;
/// Display control base: display on, brightness in bits 0-2.
pub const DISPLAY_CONTROL: u8 = 0x88;

/// Number of digit cells on the module.
pub const CELL_COUNT: usize = 4;

/// Hold after each CLK rising edge.
const BIT_HOLD_US: u32 = 1;
/// Wait around the acknowledgment sample.
const ACK_WAIT_US: u32 = 50;

#[derive(Error, Debug)]
pub enum Tm1637Error {
    #[error(transparent)]
    Gpio(#[from] GpioError),

    #[error("cell {0} is out of range (expected 0-3)")]
    InvalidCell(u8),

    #[error("brightness {0} is out of range (expected 0-7)")]
    InvalidBrightness(u8),

    #[error("{count} bytes starting at cell {first} run past the last cell")]
    TooManyCells { first: u8, count: usize },
}

/// One of the four digit positions, always in `0..=3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell(u8);

impl Cell {
    /// All cells, left to right.
    pub const ALL: [Cell; CELL_COUNT] = [Cell(0), Cell(1), Cell(2), Cell(3)];

    pub fn new(index: u8) -> Result<Self, Tm1637Error> {
        if usize::from(index) < CELL_COUNT {
            Ok(Cell(index))
        } else {
            Err(Tm1637Error::InvalidCell(index))
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Address command selecting this cell.
    pub fn address(self) -> u8 {
        START_ADDR | self.0
    }
}

/// Display brightness, `0` (dimmest) to `7` (brightest).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Brightness(u8);

impl Brightness {
    pub const MAX: Brightness = Brightness(7);

    pub fn new(level: u8) -> Result<Self, Tm1637Error> {
        if level <= Self::MAX.0 {
            Ok(Brightness(level))
        } else {
            Err(Tm1637Error::InvalidBrightness(level))
        }
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Display control command: display on at this brightness.
    pub fn control_byte(self) -> u8 {
        DISPLAY_CONTROL + self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::MAX
    }
}

/// A TM1637 module on two GPIO lines.
///
/// Owns the pin I/O, both line numbers, and the direction DIO is currently
/// configured for. CLK is always an output.
pub struct Tm1637<P, D> {
    io: P,
    delay: D,
    dio: PinId,
    clk: PinId,
    dio_direction: Direction,
    brightness: Brightness,
}

impl<P, D> Tm1637<P, D>
where
    P: PinIo,
    D: DelayNs,
{
    /// Create a driver. Nothing touches the lines until [`Tm1637::init`].
    pub fn new(io: P, delay: D, dio: PinId, clk: PinId) -> Self {
        Self {
            io,
            delay,
            dio,
            clk,
            dio_direction: Direction::Output,
            brightness: Brightness::default(),
        }
    }

    pub fn with_brightness(mut self, brightness: Brightness) -> Self {
        self.brightness = brightness;
        self
    }

    /// Export both lines and make them outputs.
    pub fn init(&mut self) -> Result<(), Tm1637Error> {
        log::info!(
            "Initialising TM1637 on DIO={} CLK={}, brightness {}",
            self.dio,
            self.clk,
            self.brightness.level()
        );

        self.io.export(self.dio)?;
        self.io.export(self.clk)?;
        self.io.set_direction(self.clk, Direction::Output)?;
        self.set_dio_direction(Direction::Output)?;

        // Idle bus: both lines high
        self.set_clk(Level::High)?;
        self.set_dio(Level::High)?;
        Ok(())
    }

    /// Takes effect on the next display write.
    pub fn set_brightness(&mut self, brightness: Brightness) {
        self.brightness = brightness;
    }

    pub fn dio_direction(&self) -> Direction {
        self.dio_direction
    }

    pub fn io(&self) -> &P {
        &self.io
    }

    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    pub fn into_parts(self) -> (P, D) {
        (self.io, self.delay)
    }

    fn set_clk(&mut self, level: Level) -> Result<(), GpioError> {
        self.io.write(self.clk, level)
    }

    fn set_dio(&mut self, level: Level) -> Result<(), GpioError> {
        self.io.write(self.dio, level)
    }

    fn set_dio_direction(&mut self, direction: Direction) -> Result<(), GpioError> {
        self.io.set_direction(self.dio, direction)?;
        self.dio_direction = direction;
        Ok(())
    }

    /// Start condition: DIO falls while CLK is high.
    pub fn start(&mut self) -> Result<(), GpioError> {
        self.set_clk(Level::High)?;
        self.set_dio(Level::High)?;
        self.set_dio(Level::Low)?;
        self.set_clk(Level::Low)
    }

    /// Stop condition: DIO rises while CLK is high.
    pub fn stop(&mut self) -> Result<(), GpioError> {
        self.set_clk(Level::Low)?;
        self.set_dio(Level::Low)?;
        self.set_clk(Level::High)?;
        self.set_dio(Level::High)
    }

    /// Clock out one byte LSB first, then run the acknowledgment turnaround.
    ///
    /// Returns the level sampled on DIO during the ninth clock: `Low` means
    /// the controller acknowledged. A missing ack is not an error here.
    pub fn write_byte(&mut self, byte: u8) -> Result<Level, GpioError> {
        let mut data = byte;
        for _ in 0..8 {
            self.set_clk(Level::Low)?;
            self.set_dio(Level::from_lsb(data))?;
            data >>= 1;
            self.set_clk(Level::High)?;
            self.delay.delay_us(BIT_HOLD_US);
        }

        // Ack clock: release DIO and let the controller pull it down
        self.set_clk(Level::Low)?;
        self.set_dio(Level::High)?;
        self.set_clk(Level::High)?;
        self.set_dio_direction(Direction::Input)?;
        self.delay.delay_us(ACK_WAIT_US);

        let ack = self.io.read(self.dio)?;
        if ack.is_low() {
            self.set_dio_direction(Direction::Output)?;
            self.set_dio(Level::Low)?;
        } else {
            log::debug!("TM1637 did not acknowledge byte {:#04x}", byte);
        }

        self.delay.delay_us(ACK_WAIT_US);
        self.set_dio_direction(Direction::Output)?;
        self.delay.delay_us(ACK_WAIT_US);

        Ok(ack)
    }

    /// One framed transaction: start, every byte in order, stop.
    fn transaction(&mut self, bytes: &[u8]) -> Result<(), GpioError> {
        self.start()?;
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        self.stop()
    }

    /// Write the segment mask of a single cell.
    ///
    /// Addressing mode and brightness are re-sent with every cell.
    pub fn display(&mut self, cell: Cell, segments: u8) -> Result<(), Tm1637Error> {
        self.transaction(&[FIXED_ADDR])?;
        self.transaction(&[cell.address(), segments])?;
        self.transaction(&[self.brightness.control_byte()])?;
        Ok(())
    }

    /// Write consecutive cells starting at `first` in one auto-increment
    /// transaction.
    pub fn write_cells(&mut self, first: Cell, segments: &[u8]) -> Result<(), Tm1637Error> {
        if usize::from(first.index()) + segments.len() > CELL_COUNT {
            return Err(Tm1637Error::TooManyCells {
                first: first.index(),
                count: segments.len(),
            });
        }

        let mut frame = Vec::with_capacity(1 + segments.len());
        frame.push(first.address());
        frame.extend_from_slice(segments);

        self.transaction(&[AUTO_ADDR])?;
        self.transaction(&frame)?;
        self.transaction(&[self.brightness.control_byte()])?;
        Ok(())
    }

    /// Blank every cell.
    pub fn clear(&mut self) -> Result<(), Tm1637Error> {
        self.write_cells(Cell::ALL[0], &[0x00; CELL_COUNT])
    }
}
