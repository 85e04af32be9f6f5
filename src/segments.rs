//! # Seven-Segment Encoding
//!
//! Bit layout of one display cell, as wired on the common TM1637 modules.
//! Segments run clockwise from the top, with the middle bar last:
//!
//! ```text
//!      A
//!     ---
//!  F |   | B
//!     -G-
//!  E |   | C
//!     ---
//!      D     (bit 7 = separator)
//! ```

pub const SEG_A: u8 = 0x01;
pub const SEG_B: u8 = 0x02;
pub const SEG_C: u8 = 0x04;
pub const SEG_D: u8 = 0x08;
pub const SEG_E: u8 = 0x10;
pub const SEG_F: u8 = 0x20;
pub const SEG_G: u8 = 0x40;

/// Colon/point indicator, OR-ed onto a digit mask when lit.
pub const SEPARATOR: u8 = 0x80;

/// Segment mask for each decimal digit.
///
/// `6` is `!SEG_B` (0xFD): every bit except B, separator bit included.
pub const DIGIT_MASKS: [u8; 10] = [
    0x3F, // 0
    0x06, // 1
    0x5B, // 2
    0x4F, // 3
    SEG_B | SEG_C | SEG_F | SEG_G, // 4
    SEG_A | SEG_C | SEG_D | SEG_F | SEG_G, // 5
    !SEG_B, // 6
    SEG_A | SEG_B | SEG_C, // 7
    0x7F, // 8
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_F | SEG_G, // 9
];

/// `mask` with the separator bit set when `points` is on.
pub fn with_separator(mask: u8, points: bool) -> u8 {
    if points {
        mask | SEPARATOR
    } else {
        mask
    }
}
