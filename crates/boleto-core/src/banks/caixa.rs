//! Caixa Econômica Federal, SIGCB collection standard.
//!
//! Nosso número is 17 digits: wallet (1), issuance (1) and a 15-digit
//! document number. The free field interleaves the wallet and issuance
//! digits between slices of the remaining digits:
//!
//! | Free-field positions | Content                       |
//! |----------------------|-------------------------------|
//! | 1-6                  | agreement (código do cedente) |
//! | 7                    | agreement check digit         |
//! | 8-10                 | composite digits 3-5          |
//! | 11                   | composite digit 1 (wallet)    |
//! | 12-14                | composite digits 6-8          |
//! | 15                   | composite digit 2 (issuance)  |
//! | 16-24                | composite digits 9-17         |
//! | 25                   | free-field check digit        |

use tracing::debug;

use super::layout::{FieldValues, FreeFieldLayout, Slot};
use super::{check_setting_digits, check_wallet, effective_wallet, reject_setting, BankVariant};
use crate::checksum::modulo11::BANK_DOCUMENT;
use crate::error::{ConfigurationError, Result};
use crate::format;
use crate::models::config::BankSettings;
use crate::models::slip::PaymentSlip;

pub const BANK_CODE: &str = "104";
pub const BANK_CODE_CHECK_DIGIT: &str = "0";

/// Agreement number width.
pub const AGREEMENT_WIDTH: usize = 6;

/// Width of the SIGCB document composite.
pub const COMPOSITE_WIDTH: usize = 17;

/// Wallets: 1 registered, 2 unregistered.
pub const WALLETS: &[&str] = &["1", "2"];

/// Free-field template shared by every SIGCB product.
pub const SIGCB_LAYOUT: FreeFieldLayout = FreeFieldLayout {
    slots: &[
        Slot::Agreement,
        Slot::AgreementCheckDigit,
        Slot::Composite { start: 2, end: 5 },
        Slot::Composite { start: 0, end: 1 },
        Slot::Composite { start: 5, end: 8 },
        Slot::Composite { start: 1, end: 2 },
        Slot::Composite { start: 8, end: 17 },
    ],
    check: BANK_DOCUMENT,
    trailing_check: true,
};

const NAME: &str = "caixa";
const DOCUMENT_WIDTH: usize = 15;

/// Caixa standard collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caixa {
    wallet: String,
    issuance: String,
}

impl Caixa {
    /// Caixa with wallet `1` and issuance `4` (issued by the payee).
    pub fn new() -> Self {
        Self {
            wallet: "1".to_string(),
            issuance: "4".to_string(),
        }
    }

    /// Apply configured overrides.
    pub fn from_settings(settings: &BankSettings) -> std::result::Result<Self, ConfigurationError> {
        reject_setting(NAME, "prefix", settings.prefix.as_ref())?;

        let mut caixa = Self::new();
        if let Some(wallet) = &settings.wallet {
            check_wallet(NAME, wallet, WALLETS)?;
            caixa.wallet = wallet.clone();
        }
        if let Some(issuance) = &settings.issuance {
            check_setting_digits(NAME, "issuance", issuance, 1)?;
            caixa.issuance = issuance.clone();
        }
        Ok(caixa)
    }

    fn wallet<'a>(&'a self, slip: &'a PaymentSlip) -> Result<&'a str> {
        let wallet = effective_wallet(slip, &self.wallet);
        check_wallet(NAME, wallet, WALLETS)?;
        Ok(wallet)
    }

    fn agreement(&self, slip: &PaymentSlip) -> Result<String> {
        format::numeric("agreement", &slip.bank.agreement, AGREEMENT_WIDTH)
    }
}

impl Default for Caixa {
    fn default() -> Self {
        Self::new()
    }
}

impl BankVariant for Caixa {
    fn name(&self) -> &'static str {
        NAME
    }

    fn bank_code(&self) -> &'static str {
        BANK_CODE
    }

    fn bank_code_check_digit(&self) -> &'static str {
        BANK_CODE_CHECK_DIGIT
    }

    fn document_composite_width(&self, _slip: &PaymentSlip) -> Result<usize> {
        Ok(COMPOSITE_WIDTH)
    }

    fn document_composite(&self, slip: &PaymentSlip) -> Result<String> {
        let document = format::numeric("document_number", &slip.bank.document_number, DOCUMENT_WIDTH)?;
        Ok(format!("{}{}{}", self.wallet(slip)?, self.issuance, document))
    }

    fn document_composite_check_digit(&self, slip: &PaymentSlip) -> Result<u8> {
        Ok(BANK_DOCUMENT.compute(&self.document_composite(slip)?)?)
    }

    fn free_field(&self, slip: &PaymentSlip) -> Result<String> {
        let agreement = self.agreement(slip)?;
        let composite = self.document_composite(slip)?;

        let field = SIGCB_LAYOUT.render(&FieldValues {
            agreement: &agreement,
            composite: &composite,
            composite_check_digit: BANK_DOCUMENT.compute(&composite)?,
            wallet: self.wallet(slip)?,
        })?;

        debug!(bank = NAME, free_field = %field, "assembled free field");
        Ok(field)
    }

    fn printable_agreement_and_account(&self, slip: &PaymentSlip) -> Result<String> {
        let agreement = self.agreement(slip)?;
        let check_digit = BANK_DOCUMENT.compute(&agreement)?;
        Ok(format!("{}/{}-{}", slip.bank.agency.trim(), agreement, check_digit))
    }
}
