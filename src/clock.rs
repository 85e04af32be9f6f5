//! # Clock Application
//!
//! Shows `HH:MM` on the four cells and blinks the separator by flipping it
//! on every refresh. The loop has no exit; the process runs until it is
//! killed or a GPIO error ends it.

use crate::pin::PinIo;
use crate::segments::{with_separator, DIGIT_MASKS};
use crate::tm1637::{Cell, Tm1637, Tm1637Error, CELL_COUNT};
use chrono::{DateTime, Local, TimeZone, Timelike};
use embedded_hal::delay::DelayNs;
use std::convert::Infallible;
use std::fmt;
use thiserror::Error;

/// Time between display refreshes, 0.75 s.
pub const DEFAULT_REFRESH_MS: u32 = 750;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClockError {
    #[error("{hours:02}:{minutes:02} is not a valid time of day")]
    InvalidTime { hours: u8, minutes: u8 },
}

/// Hours (0-23) and minutes (0-59), the only part of the time the display
/// shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeOfDay {
    hours: u8,
    minutes: u8,
}

impl TimeOfDay {
    pub fn new(hours: u8, minutes: u8) -> Result<Self, ClockError> {
        if hours < 24 && minutes < 60 {
            Ok(Self { hours, minutes })
        } else {
            Err(ClockError::InvalidTime { hours, minutes })
        }
    }

    pub fn from_datetime<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        // chrono keeps hour() in 0..24 and minute() in 0..60
        Self {
            hours: time.hour() as u8,
            minutes: time.minute() as u8,
        }
    }

    pub fn hours(self) -> u8 {
        self.hours
    }

    pub fn minutes(self) -> u8 {
        self.minutes
    }

    /// Hour tens, hour ones, minute tens, minute ones.
    pub fn digits(self) -> [u8; CELL_COUNT] {
        [
            self.hours / 10,
            self.hours % 10,
            self.minutes / 10,
            self.minutes % 10,
        ]
    }

    /// Segment masks for the four cells, separator lit when `points` is on.
    pub fn masks(self, points: bool) -> [u8; CELL_COUNT] {
        self.digits()
            .map(|digit| with_separator(DIGIT_MASKS[usize::from(digit)], points))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

/// Source of the current local time.
pub trait WallClock {
    fn now(&self) -> TimeOfDay;
}

/// The system clock in the local timezone.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl WallClock for LocalClock {
    fn now(&self) -> TimeOfDay {
        TimeOfDay::from_datetime(&Local::now())
    }
}

/// The clock: a display, a time source and the blink state.
pub struct Clock<P, D, W> {
    display: Tm1637<P, D>,
    wall: W,
    refresh_ms: u32,
    points: bool,
}

impl<P, D, W> Clock<P, D, W>
where
    P: PinIo,
    D: DelayNs,
    W: WallClock,
{
    pub fn new(display: Tm1637<P, D>, wall: W, refresh_ms: u32) -> Self {
        Self {
            display,
            wall,
            refresh_ms,
            points: false,
        }
    }

    /// Separator state the next refresh will draw.
    pub fn points(&self) -> bool {
        self.points
    }

    pub fn display(&self) -> &Tm1637<P, D> {
        &self.display
    }

    pub fn into_display(self) -> Tm1637<P, D> {
        self.display
    }

    /// Draw `time` on all four cells, then flip the separator.
    ///
    /// Returns the masks that were sent.
    pub fn refresh(&mut self, time: TimeOfDay) -> Result<[u8; CELL_COUNT], Tm1637Error> {
        let masks = time.masks(self.points);
        for (cell, &mask) in Cell::ALL.iter().zip(masks.iter()) {
            self.display.display(*cell, mask)?;
        }
        self.points = !self.points;
        Ok(masks)
    }

    /// One loop iteration: read the time, draw it, sleep.
    pub fn tick(&mut self) -> Result<(), Tm1637Error> {
        let now = self.wall.now();
        log::debug!("Showing {} (separator {})", now, self.points);
        self.refresh(now)?;
        self.display.delay_mut().delay_ms(self.refresh_ms);
        Ok(())
    }

    /// Refresh forever. Only returns on error.
    pub fn run(&mut self) -> Result<Infallible, Tm1637Error> {
        log::info!("Clock running, refresh every {} ms", self.refresh_ms);
        loop {
            self.tick()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn rejects_out_of_range_time() {
        assert_eq!(
            TimeOfDay::new(24, 0),
            Err(ClockError::InvalidTime {
                hours: 24,
                minutes: 0
            })
        );
        assert!(TimeOfDay::new(23, 60).is_err());
        assert!(TimeOfDay::new(23, 59).is_ok());
    }

    #[test]
    fn every_time_of_day_decomposes_to_decimal_digits() {
        for hours in 0..24 {
            for minutes in 0..60 {
                let time = TimeOfDay::new(hours, minutes).unwrap();
                let digits = time.digits();
                assert!(digits.iter().all(|&d| d <= 9), "{time} gave {digits:?}");
                assert_eq!(digits[0] * 10 + digits[1], hours);
                assert_eq!(digits[2] * 10 + digits[3], minutes);
            }
        }
    }

    #[test]
    fn from_datetime_takes_hour_and_minute() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(21, 7, 45)
            .unwrap()
            .and_utc();
        let time = TimeOfDay::from_datetime(&dt);
        assert_eq!((time.hours(), time.minutes()), (21, 7));
        assert_eq!(time.to_string(), "21:07");

        // Any timezone works
        let now = TimeOfDay::from_datetime(&Utc::now());
        assert!(now.hours() < 24 && now.minutes() < 60, "got {now}");
        assert_eq!(TimeOfDay::new(now.hours(), now.minutes()), Ok(now));
    }

    #[test]
    fn masks_for_late_evening() {
        let time = TimeOfDay::new(23, 59).unwrap();
        assert_eq!(time.digits(), [2, 3, 5, 9]);
        assert_eq!(time.masks(false), [0x5B, 0x4F, 0x6D, 0x6F]);
        assert_eq!(time.masks(true), [0xDB, 0xCF, 0xED, 0xEF]);
    }
}
