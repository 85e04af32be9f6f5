//! Blocking delays for the bit-banged bus.
//!
//! Bit timing only needs to be "at least this long", so a plain
//! `thread::sleep` is enough. Jitter from the scheduler is tolerated by the
//! controller.

use embedded_hal::delay::DelayNs;
use std::thread;
use std::time::Duration;

/// [`DelayNs`] backed by `std::thread::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SleepDelay;

impl DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn sleeps_at_least_requested_time() {
        let mut delay = SleepDelay;
        let start = Instant::now();
        delay.delay_ms(5);
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
