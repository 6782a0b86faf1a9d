//! Barcode assembly and the typeable line derived from it.
//!
//! Layout of the 44-digit barcode:
//!
//! | Positions | Content                                  |
//! |-----------|------------------------------------------|
//! | 1-3       | bank code                                |
//! | 4         | currency code                            |
//! | 5         | general check digit (modulo 11)          |
//! | 6-9       | due-date factor                          |
//! | 10-19     | amount in cents                          |
//! | 20-44     | free field, defined by the issuing bank  |

pub mod factor;
mod patterns;
mod typeable;

pub use factor::{due_date_factor, factor_to_date};
pub use typeable::TypeableLine;

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::{debug, warn};

use crate::checksum::modulo11::BARCODE;
use crate::checksum::digit_char;
use crate::error::{BoletoError, FieldWidthError, Result};
use crate::format;

/// Length of a barcode.
pub const BARCODE_LEN: usize = 44;

/// Length of a bank free field.
pub const FREE_FIELD_LEN: usize = 25;

/// Position of the general check digit (0-based).
const CHECK_DIGIT_POS: usize = 4;

/// A validated 44-digit barcode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Barcode(String);

/// Fields decoded from a barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarcodeFields {
    pub bank_code: String,
    pub currency_code: char,
    pub check_digit: u8,
    pub due_factor: u16,
    /// Amount, `None` for open-value slips.
    pub amount: Option<Decimal>,
    pub free_field: String,
}

/// Assemble a barcode from its parts.
///
/// `free_field` must already be the bank's 25-digit free field.
pub fn assemble(
    bank_code: &str,
    currency_code: char,
    amount: Option<Decimal>,
    due_date: Option<NaiveDate>,
    free_field: &str,
) -> Result<Barcode> {
    format::exact_digits("bank_code", bank_code, 3)?;
    if !currency_code.is_ascii_digit() {
        return Err(BoletoError::validation(
            "currency_code",
            format!("must be a digit, got {:?}", currency_code),
        ));
    }
    if free_field.len() != FREE_FIELD_LEN {
        return Err(FieldWidthError {
            field: "free_field".to_string(),
            width: FREE_FIELD_LEN,
            actual: free_field.chars().count(),
        }
        .into());
    }

    let factor = due_date_factor(due_date)?;
    let amount = amount_field(amount)?;

    let body = format!("{}{}{}{}{}", bank_code, currency_code, factor, amount, free_field);
    let check_digit = BARCODE.compute(&body)?;

    let mut digits = body;
    digits.insert(CHECK_DIGIT_POS, digit_char(check_digit));

    debug!(barcode = %digits, "assembled barcode");
    Ok(Barcode(digits))
}

/// Ten-digit amount field in cents. Absent amounts encode as zeros.
pub fn amount_field(amount: Option<Decimal>) -> Result<String> {
    let Some(amount) = amount else {
        return Ok("0".repeat(10));
    };

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(BoletoError::validation(
            "amount",
            format!("must not be negative, got {}", amount),
        ));
    }

    let cents = (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or_else(|| BoletoError::validation("amount", format!("{} is out of range", amount)))?;

    format::numeric("amount", &cents.to_string(), 10)
}

impl Barcode {
    /// Parse and verify a 44-digit barcode.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.len() != BARCODE_LEN || !input.chars().all(|c| c.is_ascii_digit()) {
            return Err(BoletoError::validation(
                "barcode",
                format!("must be {} digits, got {:?}", BARCODE_LEN, input),
            ));
        }

        let barcode = Self(input.to_string());
        let expected = BARCODE.compute(&barcode.body())?;
        if barcode.check_digit() != expected {
            warn!(barcode = input, expected, "barcode check digit mismatch");
            return Err(BoletoError::validation(
                "barcode",
                format!(
                    "check digit is {} but should be {}",
                    barcode.check_digit(),
                    expected
                ),
            ));
        }

        Ok(barcode)
    }

    /// The 44 digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 43 digits covered by the general check digit.
    fn body(&self) -> String {
        format!("{}{}", &self.0[..CHECK_DIGIT_POS], &self.0[CHECK_DIGIT_POS + 1..])
    }

    pub fn bank_code(&self) -> &str {
        &self.0[0..3]
    }

    pub fn currency_code(&self) -> char {
        char::from(self.0.as_bytes()[3])
    }

    pub fn check_digit(&self) -> u8 {
        self.0.as_bytes()[CHECK_DIGIT_POS] - b'0'
    }

    pub fn due_factor(&self) -> &str {
        &self.0[5..9]
    }

    pub fn amount_cents(&self) -> &str {
        &self.0[9..19]
    }

    pub fn free_field(&self) -> &str {
        &self.0[19..44]
    }

    /// Decode the barcode into its fields.
    pub fn decode(&self) -> BarcodeFields {
        let cents: i64 = self.amount_cents().parse().unwrap_or(0);
        let amount = (cents != 0).then(|| Decimal::new(cents, 2));

        BarcodeFields {
            bank_code: self.bank_code().to_string(),
            currency_code: self.currency_code(),
            check_digit: self.check_digit(),
            due_factor: self.due_factor().parse().unwrap_or(0),
            amount,
            free_field: self.free_field().to_string(),
        }
    }

    /// Derive the typeable line.
    pub fn typeable_line(&self) -> Result<TypeableLine> {
        TypeableLine::from_barcode(self)
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Barcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const UNION_FREE_FIELD: &str = "0001236000100040000000427";
    const UNION_BARCODE: &str = "10491376900000123450001236000100040000000427";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_assemble_layout() {
        let barcode = assemble(
            "104",
            '9',
            Some(Decimal::new(12345, 2)),
            Some(date(2008, 2, 1)),
            UNION_FREE_FIELD,
        )
        .unwrap();

        assert_eq!(barcode.as_str(), UNION_BARCODE);
        assert_eq!(barcode.as_str().len(), 44);
        assert!(barcode.as_str().chars().all(|c| c.is_ascii_digit()));
        assert_eq!(barcode.bank_code(), "104");
        assert_eq!(barcode.currency_code(), '9');
        assert_eq!(barcode.check_digit(), 1);
        assert_eq!(barcode.due_factor(), "3769");
        assert_eq!(barcode.amount_cents(), "0000012345");
        assert_eq!(barcode.free_field(), UNION_FREE_FIELD);
    }

    #[test]
    fn test_assemble_open_value_without_due_date() {
        let barcode = assemble("033", '9', None, None, "9028203300000000027200102").unwrap();
        assert_eq!(barcode.as_str(), "03394000000000000009028203300000000027200102");
        assert_eq!(barcode.decode().amount, None);
        assert_eq!(barcode.decode().due_factor, 0);
    }

    #[test]
    fn test_assemble_rejects_short_free_field() {
        let err = assemble("104", '9', None, None, "123").unwrap_err();
        assert!(matches!(err, BoletoError::FieldWidth(ref e) if e.width == 25 && e.actual == 3));
    }

    #[test]
    fn test_assemble_rejects_non_digit_free_field() {
        let err = assemble("104", '9', None, None, "000123600010004000000042X").unwrap_err();
        assert!(matches!(err, BoletoError::Precondition(_)));
    }

    #[test]
    fn test_amount_field() {
        assert_eq!(amount_field(None).unwrap(), "0000000000");
        assert_eq!(amount_field(Some(Decimal::new(2550, 2))).unwrap(), "0000002550");
        assert_eq!(amount_field(Some(Decimal::new(1000, 0))).unwrap(), "0000100000");
        // half-cent rounds away from zero
        assert_eq!(amount_field(Some(Decimal::new(10005, 3))).unwrap(), "0000001001");
    }

    #[test]
    fn test_amount_field_limits() {
        assert!(matches!(
            amount_field(Some(Decimal::new(-1, 2))),
            Err(BoletoError::Validation { .. })
        ));
        assert!(matches!(
            amount_field(Some(Decimal::new(100_000_000_00, 0))),
            Err(BoletoError::FieldWidth(_))
        ));
        assert_eq!(
            amount_field(Some(Decimal::new(99_999_999_99, 2))).unwrap(),
            "9999999999"
        );
    }

    #[test]
    fn test_parse_valid_barcode() {
        let barcode = Barcode::parse(UNION_BARCODE).unwrap();
        let fields = barcode.decode();
        assert_eq!(fields.bank_code, "104");
        assert_eq!(fields.due_factor, 3769);
        assert_eq!(fields.amount, Some(Decimal::new(12345, 2)));
        assert_eq!(fields.free_field, UNION_FREE_FIELD);
    }

    #[test]
    fn test_parse_rejects_bad_check_digit() {
        let tampered = "10492376900000123450001236000100040000000427";
        assert!(matches!(
            Barcode::parse(tampered),
            Err(BoletoError::Validation { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(Barcode::parse("1049").is_err());
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let a = assemble("104", '9', Some(Decimal::new(1, 0)), Some(date(2012, 5, 10)), UNION_FREE_FIELD).unwrap();
        let b = assemble("104", '9', Some(Decimal::new(1, 0)), Some(date(2012, 5, 10)), UNION_FREE_FIELD).unwrap();
        assert_eq!(a, b);
    }
}
