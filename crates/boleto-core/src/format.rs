//! Fixed-width field formatting.
//!
//! Numeric sub-fields of a slip are right-justified and zero-padded to the
//! width their bank mandates. A value wider than its field is rejected, never
//! truncated.

use crate::error::{BoletoError, FieldWidthError, Result};

/// Alignment of a value inside its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Right,
}

/// Pad `value` to exactly `width` characters.
///
/// Fails with [`FieldWidthError`] when `width` is zero or `value` is longer
/// than `width`. Padding an already-padded value returns it unchanged.
pub fn fixed_width(
    field: &str,
    value: &str,
    width: usize,
    pad: char,
    justify: Justify,
) -> std::result::Result<String, FieldWidthError> {
    let len = value.chars().count();

    if width == 0 || len > width {
        return Err(FieldWidthError {
            field: field.to_string(),
            width,
            actual: len,
        });
    }

    let padding: String = std::iter::repeat_n(pad, width - len).collect();

    Ok(match justify {
        Justify::Right => format!("{}{}", padding, value),
        Justify::Left => format!("{}{}", value, padding),
    })
}

/// Right-justify a numeric field and zero-pad it to `width`.
///
/// Surrounding whitespace is ignored; anything else that is not an ASCII
/// digit is a validation failure.
pub fn numeric(field: &str, value: &str, width: usize) -> Result<String> {
    let value = value.trim();

    if let Some(c) = value.chars().find(|c| !c.is_ascii_digit()) {
        return Err(BoletoError::validation(
            field,
            format!("must contain only digits, found {:?}", c),
        ));
    }

    Ok(fixed_width(field, value, width, '0', Justify::Right)?)
}

/// Left-justify an alphanumeric field and pad it with spaces.
pub fn alphanumeric(field: &str, value: &str, width: usize) -> Result<String> {
    Ok(fixed_width(field, value.trim(), width, ' ', Justify::Left)?)
}

/// Check that a numeric value has exactly `width` digits.
pub fn exact_digits(field: &str, value: &str, width: usize) -> Result<()> {
    let len = value.chars().count();

    if len != width || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(BoletoError::validation(
            field,
            format!("must have exactly {} digits, got {:?}", width, value),
        ));
    }

    Ok(())
}
