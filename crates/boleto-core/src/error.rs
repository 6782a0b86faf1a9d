//! Error types for the boleto-core library.

use thiserror::Error;

/// Main error type for the boleto library.
#[derive(Error, Debug)]
pub enum BoletoError {
    /// Bank selector, wallet or setting is not supported.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A numeric field does not fit its bank-mandated width.
    #[error("field width error: {0}")]
    FieldWidth(#[from] FieldWidthError),

    /// Check-digit input was malformed.
    #[error("precondition violated: {0}")]
    Precondition(#[from] PreconditionError),

    /// A value is outside the domain accepted by the encoder.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BoletoError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors caused by an unsupported bank setup. These are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No variant is registered under the selector.
    #[error("unknown bank: {0}")]
    UnknownBank(String),

    /// The wallet has no field-width rule for this bank.
    #[error("wallet {wallet} is not supported by {bank}")]
    UnsupportedWallet { bank: String, wallet: String },

    /// A bank setting has the wrong shape.
    #[error("invalid {setting} for {bank}: {reason}")]
    InvalidSetting {
        bank: String,
        setting: String,
        reason: String,
    },
}

/// A numeric field is longer than the width its bank mandates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} must have at most {width} digits, got {actual}")]
pub struct FieldWidthError {
    /// Field name.
    pub field: String,
    /// Mandated width.
    pub width: usize,
    /// Length of the offending value.
    pub actual: usize,
}

/// Check-digit input that breaks the calculator's contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    /// Input contains a character that is not an ASCII digit.
    #[error("non-digit {found:?} at position {position} in {input:?}")]
    NonDigit {
        input: String,
        position: usize,
        found: char,
    },

    /// The residue rule produced a value the remap table does not cover.
    #[error("residue {0} is not a single digit and has no mapping")]
    UnmappedResidue(u32),

    /// An empty weight cycle was supplied.
    #[error("weight cycle is empty")]
    EmptyWeights,
}

/// Result type for the boleto library.
pub type Result<T> = std::result::Result<T, BoletoError>;
