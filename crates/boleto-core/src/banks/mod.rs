//! Bank variants.
//!
//! Each issuing bank defines its own document composite, check-digit rule and
//! free-field layout on top of the shared barcode skeleton. A variant holds
//! the bank's configuration and is invoked with a [`PaymentSlip`] per call; it
//! never stores slip data, so one instance can serve any number of threads.

pub mod caixa;
pub mod guia_sindical;
pub mod layout;
pub mod santander;

pub use caixa::Caixa;
pub use guia_sindical::GuiaSindicalCaixa;
pub use layout::{FieldValues, FreeFieldLayout, Slot};
pub use santander::Santander;

use std::fmt;

use crate::error::{ConfigurationError, Result};
use crate::models::slip::PaymentSlip;

/// Bank-specific encoding rules.
pub trait BankVariant: fmt::Debug + Send + Sync {
    /// Registry name of the variant.
    fn name(&self) -> &'static str;

    /// Three-digit bank code.
    fn bank_code(&self) -> &'static str;

    /// Check digit printed after the bank code.
    fn bank_code_check_digit(&self) -> &'static str;

    /// Width of the document composite for this slip.
    fn document_composite_width(&self, slip: &PaymentSlip) -> Result<usize>;

    /// Document composite (nosso número without its check digit).
    fn document_composite(&self, slip: &PaymentSlip) -> Result<String>;

    /// Check digit of the document composite.
    fn document_composite_check_digit(&self, slip: &PaymentSlip) -> Result<u8>;

    /// The 25-digit free field placed at barcode positions 20-44.
    fn free_field(&self, slip: &PaymentSlip) -> Result<String>;

    /// Agency and agreement/account as printed on the slip.
    fn printable_agreement_and_account(&self, slip: &PaymentSlip) -> Result<String>;

    /// Nosso número as printed: composite, dash, check digit.
    fn our_number_display(&self, slip: &PaymentSlip) -> Result<String> {
        Ok(format!(
            "{}-{}",
            self.document_composite(slip)?,
            self.document_composite_check_digit(slip)?
        ))
    }

    /// Bank code and its check digit, e.g. `104-0`.
    fn bank_display(&self) -> String {
        format!("{}-{}", self.bank_code(), self.bank_code_check_digit())
    }

    /// Fixed payment-place text, when the bank mandates one.
    fn payment_place(&self) -> Option<&'static str> {
        None
    }
}

/// Wallet on the slip, or the variant's default when the slip has none.
pub(crate) fn effective_wallet<'a>(slip: &'a PaymentSlip, default: &'a str) -> &'a str {
    slip.bank
        .wallet
        .as_deref()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .unwrap_or(default)
}

/// Reject a wallet outside the accepted set.
pub(crate) fn check_wallet(
    bank: &str,
    wallet: &str,
    accepted: &[&str],
) -> std::result::Result<(), ConfigurationError> {
    if accepted.contains(&wallet) {
        Ok(())
    } else {
        Err(ConfigurationError::UnsupportedWallet {
            bank: bank.to_string(),
            wallet: wallet.to_string(),
        })
    }
}

/// Check that a setting is exactly `width` digits.
pub(crate) fn check_setting_digits(
    bank: &str,
    setting: &str,
    value: &str,
    width: usize,
) -> std::result::Result<(), ConfigurationError> {
    if value.len() == width && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidSetting {
            bank: bank.to_string(),
            setting: setting.to_string(),
            reason: format!("expected {} digit(s), got {:?}", width, value),
        })
    }
}

/// Reject a setting the bank has no use for.
pub(crate) fn reject_setting(
    bank: &str,
    setting: &str,
    value: Option<&String>,
) -> std::result::Result<(), ConfigurationError> {
    match value {
        Some(_) => Err(ConfigurationError::InvalidSetting {
            bank: bank.to_string(),
            setting: setting.to_string(),
            reason: "not used by this bank".to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_wallet() {
        let slip = PaymentSlip::default();
        assert_eq!(effective_wallet(&slip, "102"), "102");

        let slip = PaymentSlip::default().with_wallet("101");
        assert_eq!(effective_wallet(&slip, "102"), "101");

        let slip = PaymentSlip::default().with_wallet("  ");
        assert_eq!(effective_wallet(&slip, "102"), "102");
    }

    #[test]
    fn test_check_wallet() {
        assert!(check_wallet("santander", "101", &["101", "102"]).is_ok());
        assert_eq!(
            check_wallet("santander", "103", &["101", "102"]).unwrap_err(),
            ConfigurationError::UnsupportedWallet {
                bank: "santander".to_string(),
                wallet: "103".to_string(),
            }
        );
    }

    #[test]
    fn test_check_setting_digits() {
        assert!(check_setting_digits("caixa", "issuance", "4", 1).is_ok());
        assert!(check_setting_digits("caixa", "issuance", "44", 1).is_err());
        assert!(check_setting_digits("caixa", "issuance", "x", 1).is_err());
    }
}
