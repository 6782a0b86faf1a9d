//! Caixa union-dues slip (guia de recolhimento da contribuição sindical).
//!
//! Uses the SIGCB free-field template. The 17-digit composite is wallet (1),
//! issuance (1), prefix (2) and a 13-digit document number.

use tracing::debug;

use super::caixa::{self, SIGCB_LAYOUT};
use super::layout::FieldValues;
use super::{check_setting_digits, check_wallet, effective_wallet, BankVariant};
use crate::checksum::modulo11::BANK_DOCUMENT;
use crate::error::{ConfigurationError, Result};
use crate::format;
use crate::models::config::BankSettings;
use crate::models::slip::PaymentSlip;

/// Payment place printed on every union-dues slip.
pub const PAYMENT_PLACE: &str = "PREFERENCIALMENTE NAS CASAS LOTÉRICAS ATÉ O VALOR LIMITE";

/// Document number width.
pub const DOCUMENT_WIDTH: usize = 13;

const NAME: &str = "guia_sindical_caixa";
const PREFIX_WIDTH: usize = 2;

/// Caixa union-dues slip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuiaSindicalCaixa {
    wallet: String,
    issuance: String,
    prefix: String,
}

impl GuiaSindicalCaixa {
    /// Wallet `1`, issuance `4`, prefix `00`.
    pub fn new() -> Self {
        Self {
            wallet: "1".to_string(),
            issuance: "4".to_string(),
            prefix: "00".to_string(),
        }
    }

    /// Apply configured overrides.
    pub fn from_settings(settings: &BankSettings) -> std::result::Result<Self, ConfigurationError> {
        let mut guia = Self::new();
        if let Some(wallet) = &settings.wallet {
            check_wallet(NAME, wallet, caixa::WALLETS)?;
            guia.wallet = wallet.clone();
        }
        if let Some(issuance) = &settings.issuance {
            check_setting_digits(NAME, "issuance", issuance, 1)?;
            guia.issuance = issuance.clone();
        }
        if let Some(prefix) = &settings.prefix {
            check_setting_digits(NAME, "prefix", prefix, PREFIX_WIDTH)?;
            guia.prefix = prefix.clone();
        }
        Ok(guia)
    }

    fn wallet<'a>(&'a self, slip: &'a PaymentSlip) -> Result<&'a str> {
        let wallet = effective_wallet(slip, &self.wallet);
        check_wallet(NAME, wallet, caixa::WALLETS)?;
        Ok(wallet)
    }
}

impl Default for GuiaSindicalCaixa {
    fn default() -> Self {
        Self::new()
    }
}

impl BankVariant for GuiaSindicalCaixa {
    fn name(&self) -> &'static str {
        NAME
    }

    fn bank_code(&self) -> &'static str {
        caixa::BANK_CODE
    }

    fn bank_code_check_digit(&self) -> &'static str {
        caixa::BANK_CODE_CHECK_DIGIT
    }

    fn document_composite_width(&self, _slip: &PaymentSlip) -> Result<usize> {
        Ok(caixa::COMPOSITE_WIDTH)
    }

    fn document_composite(&self, slip: &PaymentSlip) -> Result<String> {
        let document = format::numeric("document_number", &slip.bank.document_number, DOCUMENT_WIDTH)?;
        Ok(format!(
            "{}{}{}{}",
            self.wallet(slip)?,
            self.issuance,
            self.prefix,
            document
        ))
    }

    fn document_composite_check_digit(&self, slip: &PaymentSlip) -> Result<u8> {
        Ok(BANK_DOCUMENT.compute(&self.document_composite(slip)?)?)
    }

    fn free_field(&self, slip: &PaymentSlip) -> Result<String> {
        let agreement = format::numeric("agreement", &slip.bank.agreement, caixa::AGREEMENT_WIDTH)?;
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
        let dues = slip.union_dues.clone().unwrap_or_default();
        Ok(format!(
            "{}/{}.{}.{}.{}",
            slip.bank.agency.trim(),
            dues.central_code.as_deref().unwrap_or("000"),
            dues.confederation_code.as_deref().unwrap_or("000"),
            dues.federation_code.as_deref().unwrap_or("000"),
            dues.union_code.as_deref().unwrap_or("00000-0"),
        ))
    }

    fn payment_place(&self) -> Option<&'static str> {
        Some(PAYMENT_PLACE)
    }
}
