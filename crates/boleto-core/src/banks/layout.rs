//! Free-field templates.
//!
//! Each bank lays out its 25-digit free field as a fixed sequence of slots,
//! some of which pick individual digits out of the document composite. The
//! template makes that ordering explicit so it can be checked on its own.

use crate::barcode::FREE_FIELD_LEN;
use crate::checksum::digit_char;
use crate::checksum::Modulo11;
use crate::error::{BoletoError, FieldWidthError, Result};
use crate::format;

/// One slot of a free-field template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Fixed digits.
    Literal(&'static str),
    /// The padded agreement number.
    Agreement,
    /// Check digit of the agreement number.
    AgreementCheckDigit,
    /// Characters `start..end` of the document composite.
    Composite { start: usize, end: usize },
    /// The whole document composite, zero-padded on the left to a width.
    CompositePadded(usize),
    /// Check digit of the document composite.
    CompositeCheckDigit,
    /// The wallet code.
    Wallet,
}

/// A bank's free-field template.
#[derive(Debug, Clone, Copy)]
pub struct FreeFieldLayout {
    /// Slots in barcode order.
    pub slots: &'static [Slot],
    /// Rule for the agreement digit and the trailing digit.
    pub check: Modulo11<'static>,
    /// Append a check digit computed over all preceding slots.
    pub trailing_check: bool,
}

/// Values the slots are filled from.
#[derive(Debug, Clone, Copy)]
pub struct FieldValues<'a> {
    pub agreement: &'a str,
    pub composite: &'a str,
    pub composite_check_digit: u8,
    pub wallet: &'a str,
}

impl FreeFieldLayout {
    /// Fill the template and return the 25-digit free field.
    pub fn render(&self, values: &FieldValues<'_>) -> Result<String> {
        let mut field = String::with_capacity(FREE_FIELD_LEN);

        for slot in self.slots {
            match *slot {
                Slot::Literal(digits) => field.push_str(digits),
                Slot::Agreement => field.push_str(values.agreement),
                Slot::AgreementCheckDigit => {
                    field.push(digit_char(self.check.compute(values.agreement)?));
                }
                Slot::Composite { start, end } => {
                    let digits = values.composite.get(start..end).ok_or_else(|| {
                        BoletoError::validation(
                            "document_composite",
                            format!(
                                "{:?} has no characters at {}..{}",
                                values.composite, start, end
                            ),
                        )
                    })?;
                    field.push_str(digits);
                }
                Slot::CompositePadded(width) => {
                    field.push_str(&format::numeric("document_composite", values.composite, width)?);
                }
                Slot::CompositeCheckDigit => field.push(digit_char(values.composite_check_digit)),
                Slot::Wallet => field.push_str(values.wallet),
            }
        }

        if self.trailing_check {
            let digit = self.check.compute(&field)?;
            field.push(digit_char(digit));
        }

        let len = field.chars().count();
        if len != FREE_FIELD_LEN {
            return Err(FieldWidthError {
                field: "free_field".to_string(),
                width: FREE_FIELD_LEN,
                actual: len,
            }
            .into());
        }

        Ok(field)
    }
}
