//! Typeable line: the 47-digit transcription of a barcode.
//!
//! The barcode is cut into five blocks. The first three carry the bank code,
//! currency and free field, each followed by its own modulo-10 digit. The
//! fourth is the general check digit and the fifth holds factor and amount.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use super::patterns::TYPEABLE_LINE;
use super::Barcode;
use crate::checksum::{digit_char, modulo10};
use crate::error::{BoletoError, Result};

/// Length of a typeable line, without separators.
pub const TYPEABLE_LINE_LEN: usize = 47;

/// A 47-digit typeable line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TypeableLine(String);

impl TypeableLine {
    /// Derive the typeable line from a barcode.
    pub fn from_barcode(barcode: &Barcode) -> Result<Self> {
        let code = barcode.as_str();

        let first = format!("{}{}", &code[0..4], &code[19..24]);
        let second = &code[24..34];
        let third = &code[34..44];

        let mut line = String::with_capacity(TYPEABLE_LINE_LEN);
        for block in [first.as_str(), second, third] {
            line.push_str(block);
            line.push(digit_char(modulo10(block)?));
        }
        line.push_str(&code[4..5]);
        line.push_str(&code[5..19]);

        Ok(Self(line))
    }

    /// Parse a typeable line, raw or with the usual separators, and verify
    /// every check digit it carries.
    pub fn parse(input: &str) -> Result<Self> {
        let caps = TYPEABLE_LINE.captures(input.trim()).ok_or_else(|| {
            BoletoError::validation(
                "typeable_line",
                format!("must be {} digits, got {:?}", TYPEABLE_LINE_LEN, input),
            )
        })?;

        let line: String = (1..=8).map(|i| &caps[i]).collect();
        let parsed = Self(line);

        for (index, (block, check)) in parsed.checked_blocks().into_iter().enumerate() {
            let expected = modulo10(block)?;
            if check != expected {
                warn!(block = index + 1, expected, found = check, "typeable line block mismatch");
                return Err(BoletoError::validation(
                    "typeable_line",
                    format!(
                        "block {} check digit is {} but should be {}",
                        index + 1,
                        check,
                        expected
                    ),
                ));
            }
        }

        parsed.to_barcode()?;
        Ok(parsed)
    }

    /// The 47 digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The three checked blocks with their modulo-10 digits.
    fn checked_blocks(&self) -> [(&str, u8); 3] {
        let digit = |i: usize| self.0.as_bytes()[i] - b'0';
        [
            (&self.0[0..9], digit(9)),
            (&self.0[10..20], digit(20)),
            (&self.0[21..31], digit(31)),
        ]
    }

    /// The five blocks, block check digits included.
    pub fn blocks(&self) -> [&str; 5] {
        [
            &self.0[0..10],
            &self.0[10..21],
            &self.0[21..32],
            &self.0[32..33],
            &self.0[33..47],
        ]
    }

    /// Render as `AAAAA.AAAAA BBBBB.BBBBBB CCCCC.CCCCCC D EEEEEEEEEEEEEE`.
    pub fn formatted(&self) -> String {
        let l = &self.0;
        format!(
            "{}.{} {}.{} {}.{} {} {}",
            &l[0..5],
            &l[5..10],
            &l[10..15],
            &l[15..21],
            &l[21..26],
            &l[26..32],
            &l[32..33],
            &l[33..47]
        )
    }

    /// Rebuild the barcode, dropping the block check digits.
    pub fn to_barcode(&self) -> Result<Barcode> {
        let l = &self.0;
        let code = format!(
            "{}{}{}{}{}{}",
            &l[0..4],
            &l[32..33],
            &l[33..47],
            &l[4..9],
            &l[10..20],
            &l[21..31]
        );
        Barcode::parse(&code)
    }
}

impl fmt::Display for TypeableLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BARCODE: &str = "10491376900000123450001236000100040000000427";
    const LINE: &str = "10490001263600010004400000004275137690000012345";
    const FORMATTED: &str = "10490.00126 36000.100044 00000.004275 1 37690000012345";

    #[test]
    fn test_from_barcode() {
        let barcode = Barcode::parse(BARCODE).unwrap();
        let line = TypeableLine::from_barcode(&barcode).unwrap();
        assert_eq!(line.as_str(), LINE);
        assert_eq!(line.as_str().len(), 47);
        assert_eq!(line.formatted(), FORMATTED);
    }

    #[test]
    fn test_blocks() {
        let line = TypeableLine::parse(LINE).unwrap();
        assert_eq!(
            line.blocks(),
            ["1049000126", "36000100044", "00000004275", "1", "37690000012345"]
        );
    }

    #[test]
    fn test_round_trip_to_barcode() {
        let line = TypeableLine::parse(LINE).unwrap();
        assert_eq!(line.to_barcode().unwrap().as_str(), BARCODE);
    }

    #[test]
    fn test_parse_formatted() {
        let line = TypeableLine::parse(FORMATTED).unwrap();
        assert_eq!(line.as_str(), LINE);
    }

    #[test]
    fn test_santander_line() {
        let barcode = Barcode::parse("03396490000000025509028203300000000027200102").unwrap();
        let line = barcode.typeable_line().unwrap();
        assert_eq!(
            line.formatted(),
            "03399.02827 03300.000001 00272.001025 6 49000000002550"
        );
    }

    #[test]
    fn test_parse_rejects_block_digit_mismatch() {
        let tampered = "10490001273600010004400000004275137690000012345";
        let err = TypeableLine::parse(tampered).unwrap_err();
        assert!(matches!(err, BoletoError::Validation { ref reason, .. } if reason.contains("block 1")));
    }

    #[test]
    fn test_parse_rejects_general_digit_mismatch() {
        let tampered = "10490001263600010004400000004275237690000012345";
        assert!(TypeableLine::parse(tampered).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TypeableLine::parse("1049").is_err());
        assert!(TypeableLine::parse("abcde.fghij").is_err());
    }

    #[test]
    fn test_parse_rejects_non_ascii_digits() {
        // U+0661 is two bytes wide and would straddle the first block.
        let arabic_indic = "10490001\u{0661}6360001000440000000427513769000001234 5";
        let err = TypeableLine::parse(arabic_indic).unwrap_err();
        assert!(matches!(err, BoletoError::Validation { ref field, .. } if field == "typeable_line"));

        let full_width: String = LINE
            .chars()
            .map(|c| char::from_u32(c as u32 - '0' as u32 + 0xFF10).unwrap())
            .collect();
        assert!(TypeableLine::parse(&full_width).is_err());
    }
}
