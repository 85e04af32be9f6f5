//! # Clock Refresh Tests
//!
//! Drive full refresh cycles against the recording mock and check what
//! reaches the wire: digit masks, cell order, separator blinking and the
//! refresh sleep.

use super::mock::{decode_transactions, MockPins, NoDelay};
use crate::clock::{Clock, TimeOfDay, WallClock, DEFAULT_REFRESH_MS};
use crate::pin::PinId;
use crate::segments::SEPARATOR;
use crate::tm1637::{Tm1637, Tm1637Error};

const DIO: PinId = 252;
const CLK: PinId = 253;

/// Wall clock stuck at one time.
struct FixedClock(TimeOfDay);

impl WallClock for FixedClock {
    fn now(&self) -> TimeOfDay {
        self.0
    }
}

fn clock_at(hours: u8, minutes: u8, pins: MockPins) -> Clock<MockPins, NoDelay, FixedClock> {
    let display = Tm1637::new(pins, NoDelay::default(), DIO, CLK);
    let time = TimeOfDay::new(hours, minutes).unwrap();
    Clock::new(display, FixedClock(time), DEFAULT_REFRESH_MS)
}

fn sent(clock: &Clock<MockPins, NoDelay, FixedClock>) -> Vec<Vec<u8>> {
    decode_transactions(clock.display().io().ops(), DIO, CLK)
}

/// Address+data frames, one per cell, in the order they were written.
fn cell_frames(transactions: &[Vec<u8>]) -> Vec<(u8, u8)> {
    transactions
        .iter()
        .filter(|t| t.len() == 2)
        .map(|t| (t[0], t[1]))
        .collect()
}

#[test]
fn one_refresh_is_twelve_transactions() {
    let mut clock = clock_at(9, 5, MockPins::new());
    clock.tick().unwrap();

    let transactions = sent(&clock);
    assert_eq!(transactions.len(), 12);
    for digit in transactions.chunks(3) {
        assert_eq!(digit[0], vec![0x44]);
        assert_eq!(digit[2], vec![0x8F]);
    }
}

/// 09:05 shows 0, 9, 0, 5; the second refresh has the separator lit.
#[test]
fn nine_oh_five_with_separator() {
    let mut clock = clock_at(9, 5, MockPins::new());
    clock.tick().unwrap();
    assert!(clock.points());
    clock.tick().unwrap();

    let frames = cell_frames(&sent(&clock));
    assert_eq!(
        &frames[4..],
        &[(0xC0, 0x3F | 0x80), (0xC1, 0x6F | 0x80), (0xC2, 0x3F | 0x80), (0xC3, 0x6D | 0x80)]
    );
}

/// 23:59 on the first refresh: separator off, plain digit masks.
#[test]
fn twenty_three_fifty_nine() {
    let mut clock = clock_at(23, 59, MockPins::new());
    let masks = clock.refresh(TimeOfDay::new(23, 59).unwrap()).unwrap();
    assert_eq!(masks, [0x5B, 0x4F, 0x6D, 0x6F]);

    let frames = cell_frames(&sent(&clock));
    assert_eq!(
        frames,
        vec![(0xC0, 0x5B), (0xC1, 0x4F), (0xC2, 0x6D), (0xC3, 0x6F)]
    );
}

/// The separator flips once per refresh and is the same on all four cells.
#[test]
fn separator_alternates_every_refresh() {
    let mut clock = clock_at(12, 34, MockPins::new());
    for _ in 0..6 {
        clock.tick().unwrap();
    }

    let frames = cell_frames(&sent(&clock));
    assert_eq!(frames.len(), 24);
    for (cycle, cells) in frames.chunks(4).enumerate() {
        let expected_on = cycle % 2 == 1;
        for &(_, mask) in cells {
            assert_eq!(
                mask & SEPARATOR != 0,
                expected_on,
                "cycle {cycle}: mask {mask:#04x}"
            );
        }
    }
}

#[test]
fn tick_sleeps_the_refresh_period() {
    let mut clock = clock_at(0, 0, MockPins::new());
    clock.tick().unwrap();
    clock.tick().unwrap();

    let (_, delay) = clock.into_display().into_parts();
    assert_eq!(delay.calls_ms(), &[750, 750]);
}

/// A GPIO failure ends the loop instead of being retried.
#[test]
fn run_returns_on_gpio_failure() {
    let mut clock = clock_at(10, 10, MockPins::failing_after(5_000));

    let err = clock.run().unwrap_err();
    assert!(matches!(err, Tm1637Error::Gpio(_)), "got {err:?}");

    let ops = clock.display().io().ops().len();
    assert_eq!(ops, 5_000, "no further pin operations after the failure");
}
