//! Modulo-10 check digit (weights 2,1 alternating from the right).

use tracing::trace;

use super::parse_digits;
use crate::error::PreconditionError;

/// Compute the modulo-10 check digit of a digit string.
///
/// Each digit is multiplied by 2 or 1, alternating from the rightmost digit
/// (which gets 2). Products above 9 are folded by summing their digits. The
/// check digit is `10 - (sum mod 10)`, with 10 mapped to 0.
pub fn modulo10(input: &str) -> Result<u8, PreconditionError> {
    let digits = parse_digits(input)?;

    let sum: u32 = digits
        .iter()
        .rev()
        .zip([2u32, 1].iter().cycle())
        .map(|(d, w)| {
            let product = d * w;
            product / 10 + product % 10
        })
        .sum();

    let digit = (10 - sum % 10) % 10;
    trace!(input, sum, digit, "modulo10");

    Ok(digit as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modulo10_known_values() {
        assert_eq!(modulo10("104").unwrap(), 0);
        assert_eq!(modulo10("033").unwrap(), 1);
        assert_eq!(modulo10("261533").unwrap(), 4);
        assert_eq!(modulo10("1").unwrap(), 8);
        assert_eq!(modulo10("10").unwrap(), 9);
    }

    #[test]
    fn test_modulo10_folds_products() {
        // 9*2 = 18 -> 1+8 = 9, 1*1 = 1 -> sum 10 -> digit 0
        assert_eq!(modulo10("19").unwrap(), 0);
    }

    #[test]
    fn test_modulo10_typeable_line_blocks() {
        assert_eq!(modulo10("104900012").unwrap(), 6);
        assert_eq!(modulo10("3600010004").unwrap(), 4);
        assert_eq!(modulo10("0000000427").unwrap(), 5);
    }

    #[test]
    fn test_modulo10_zeroes() {
        assert_eq!(modulo10("0").unwrap(), 0);
        assert_eq!(modulo10("").unwrap(), 0);
    }

    #[test]
    fn test_modulo10_non_digit() {
        assert!(matches!(
            modulo10("10.4"),
            Err(PreconditionError::NonDigit { position: 2, found: '.', .. })
        ));
    }
}
