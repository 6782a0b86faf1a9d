//! Check-digit routines used across the barcode and bank free fields.
//!
//! Every routine here is a pure function of its input digits. Malformed input
//! (anything other than ASCII digits) is reported as a [`PreconditionError`]
//! because it can only come from an upstream formatting bug.

pub mod modulo10;
pub mod modulo11;

pub use modulo10::modulo10;
pub use modulo11::{Direction, Modulo11, ResidueRule, WEIGHTS_2_TO_9, WEIGHTS_9_TO_2};

use crate::error::PreconditionError;

/// Parse a string of ASCII digits into their numeric values.
pub fn parse_digits(input: &str) -> Result<Vec<u32>, PreconditionError> {
    input
        .chars()
        .enumerate()
        .map(|(position, c)| {
            c.to_digit(10).ok_or_else(|| PreconditionError::NonDigit {
                input: input.to_string(),
                position,
                found: c,
            })
        })
        .collect()
}

/// Render a single check digit as a character.
pub fn digit_char(digit: u8) -> char {
    char::from(b'0' + digit % 10)
}
