//! # LED Clock Core Library
//!
//! This library drives a TM1637-based 4-digit 7-segment LED module from a
//! Linux board by bit-banging two GPIO lines (CLK and DIO), and shows the
//! local wall-clock time with a blinking separator.
//!
//! ## Layers
//!
//! Each layer only talks to the one below it:
//!
//! 1. **Pin I/O** ([`pin`], [`gpio_sysfs`], and `gpio_cdev` with the
//!    `hardware` feature): export a line, set its direction, read and write
//!    its level. Every operation returns a [`pin::GpioError`] on failure.
//! 2. **Protocol driver** ([`tm1637`], [`segments`]): start/stop framing,
//!    LSB-first byte writes with acknowledgment turnaround, and the
//!    display-memory write sequence.
//! 3. **Clock application** ([`clock`]): turns `HH:MM` into four segment
//!    masks and refreshes the display on a fixed period.
//!
//! ## Data Flow
//!
//! wall-clock time → digits → segment masks → serial bytes → pin transitions
//!
//! ## Error Policy
//!
//! Nothing in the library retries. Errors bubble up as `Result`s and the
//! binary decides to terminate, since a broken GPIO link leaves the display
//! unusable anyway.

// Module declarations
pub mod clock;
pub mod config;
pub mod delay;
#[cfg(feature = "hardware")]
pub mod gpio_cdev;
pub mod gpio_sysfs;
pub mod pin;
pub mod segments;
pub mod tm1637;

#[cfg(test)]
mod tests;

pub use clock::{Clock, LocalClock, TimeOfDay, WallClock};
pub use config::Config;
pub use pin::{Direction, GpioError, Level, PinId, PinIo};
pub use tm1637::{Brightness, Cell, Tm1637, Tm1637Error};
