//! Banco Santander.
//!
//! Free field:
//!
//! | Positions | Content                                        |
//! |-----------|------------------------------------------------|
//! | 1         | fixed `9`                                      |
//! | 2-8       | agreement (código do cedente)                  |
//! | 9-20      | document composite, zero-padded to 12 digits   |
//! | 21        | composite check digit                          |
//! | 22        | IOF marker, `0` for everyone but insurers      |
//! | 23-25     | wallet                                         |

use tracing::debug;

use super::layout::{FieldValues, FreeFieldLayout, Slot};
use super::{check_setting_digits, check_wallet, effective_wallet, reject_setting, BankVariant};
use crate::checksum::modulo11::BANK_DOCUMENT;
use crate::error::{ConfigurationError, Result};
use crate::format;
use crate::models::config::BankSettings;
use crate::models::slip::PaymentSlip;

pub const BANK_CODE: &str = "033";
pub const BANK_CODE_CHECK_DIGIT: &str = "7";

/// Agreement number width.
pub const AGREEMENT_WIDTH: usize = 7;

/// Maximum agency width.
pub const AGENCY_WIDTH: usize = 4;

const NAME: &str = "santander";

const LAYOUT: FreeFieldLayout = FreeFieldLayout {
    slots: &[
        Slot::Literal("9"),
        Slot::Agreement,
        Slot::CompositePadded(12),
        Slot::CompositeCheckDigit,
        Slot::Literal("0"),
        Slot::Wallet,
    ],
    check: BANK_DOCUMENT,
    trailing_check: false,
};

/// Document number width for a wallet.
pub fn document_width(wallet: &str) -> std::result::Result<usize, ConfigurationError> {
    match wallet {
        "101" => Ok(11),
        "102" => Ok(7),
        _ => Err(ConfigurationError::UnsupportedWallet {
            bank: NAME.to_string(),
            wallet: wallet.to_string(),
        }),
    }
}

/// Santander collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Santander {
    wallet: String,
    prefix: Option<String>,
}

impl Santander {
    /// Santander with wallet `102` and no document prefix.
    pub fn new() -> Self {
        Self {
            wallet: "102".to_string(),
            prefix: None,
        }
    }

    /// Apply configured overrides.
    pub fn from_settings(settings: &BankSettings) -> std::result::Result<Self, ConfigurationError> {
        reject_setting(NAME, "issuance", settings.issuance.as_ref())?;

        let mut santander = Self::new();
        if let Some(wallet) = &settings.wallet {
            document_width(wallet)?;
            santander.wallet = wallet.clone();
        }
        if let Some(prefix) = &settings.prefix {
            check_setting_digits(NAME, "prefix", prefix, 1)?;
            santander.prefix = Some(prefix.clone());
        }
        Ok(santander)
    }

    fn wallet<'a>(&'a self, slip: &'a PaymentSlip) -> Result<&'a str> {
        let wallet = effective_wallet(slip, &self.wallet);
        check_wallet(NAME, wallet, &["101", "102"])?;
        Ok(wallet)
    }

    fn agreement(&self, slip: &PaymentSlip) -> Result<String> {
        format::numeric("agreement", &slip.bank.agreement, AGREEMENT_WIDTH)
    }
}

impl Default for Santander {
    fn default() -> Self {
        Self::new()
    }
}

impl BankVariant for Santander {
    fn name(&self) -> &'static str {
        NAME
    }

    fn bank_code(&self) -> &'static str {
        BANK_CODE
    }

    fn bank_code_check_digit(&self) -> &'static str {
        BANK_CODE_CHECK_DIGIT
    }

    fn document_composite_width(&self, slip: &PaymentSlip) -> Result<usize> {
        let width = document_width(self.wallet(slip)?)?;
        Ok(width + self.prefix.as_ref().map_or(0, String::len))
    }

    fn document_composite(&self, slip: &PaymentSlip) -> Result<String> {
        let width = document_width(self.wallet(slip)?)?;
        let document = format::numeric("document_number", &slip.bank.document_number, width)?;
        Ok(format!("{}{}", self.prefix.as_deref().unwrap_or(""), document))
    }

    fn document_composite_check_digit(&self, slip: &PaymentSlip) -> Result<u8> {
        Ok(BANK_DOCUMENT.compute(&self.document_composite(slip)?)?)
    }

    fn free_field(&self, slip: &PaymentSlip) -> Result<String> {
        let agreement = self.agreement(slip)?;
        let composite = self.document_composite(slip)?;

        let field = LAYOUT.render(&FieldValues {
            agreement: &agreement,
            composite: &composite,
            composite_check_digit: BANK_DOCUMENT.compute(&composite)?,
            wallet: self.wallet(slip)?,
        })?;

        debug!(bank = NAME, free_field = %field, "assembled free field");
        Ok(field)
    }

    fn printable_agreement_and_account(&self, slip: &PaymentSlip) -> Result<String> {
        // Printed as given; only the width is checked.
        let agency = slip.bank.agency.trim();
        format::numeric("agency", agency, AGENCY_WIDTH)?;
        Ok(format!("{}/{}", agency, self.agreement(slip)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::modulo11::BANK_CODE as BANK_CODE_RULE;
    use crate::error::BoletoError;
    use pretty_assertions::assert_eq;

    fn slip() -> PaymentSlip {
        PaymentSlip::new("282033", "272", "59").with_wallet("102")
    }

    #[test]
    fn test_bank_identity() {
        let santander = Santander::new();
        assert_eq!(santander.bank_display(), "033-7");
        assert_eq!(
            BANK_CODE_RULE.compute(BANK_CODE).unwrap().to_string(),
            santander.bank_code_check_digit()
        );
    }

    #[test]
    fn test_wallet_102_pads_document_to_seven_digits() {
        let santander = Santander::new();
        assert_eq!(santander.document_composite(&slip()).unwrap(), "0000272");
        assert_eq!(santander.document_composite_width(&slip()).unwrap(), 7);
        assert_eq!(santander.our_number_display(&slip()).unwrap(), "0000272-0");
    }

    #[test]
    fn test_wallet_101_pads_document_to_eleven_digits() {
        let slip = PaymentSlip::new("1899775", "1234567", "0059").with_wallet("101");
        let santander = Santander::new();
        assert_eq!(santander.document_composite(&slip).unwrap(), "00001234567");
        assert_eq!(santander.document_composite_check_digit(&slip).unwrap(), 9);
        assert_eq!(
            santander.free_field(&slip).unwrap(),
            "9189977500000123456790101"
        );
    }

    #[test]
    fn test_free_field() {
        let field = Santander::new().free_field(&slip()).unwrap();
        assert_eq!(field, "9028203300000000027200102");
        assert_eq!(&field[0..1], "9");
        assert_eq!(&field[1..8], "0282033");
        assert_eq!(&field[8..20], "000000000272");
        assert_eq!(&field[20..21], "0");
        assert_eq!(&field[21..22], "0");
        assert_eq!(&field[22..25], "102");
    }

    #[test]
    fn test_prefix_is_prepended() {
        let santander = Santander::from_settings(&BankSettings::default().with_prefix("9")).unwrap();
        assert_eq!(santander.document_composite(&slip()).unwrap(), "90000272");
        assert_eq!(santander.document_composite_width(&slip()).unwrap(), 8);
        assert_eq!(santander.our_number_display(&slip()).unwrap(), "90000272-7");
    }

    #[test]
    fn test_unrecognized_wallet_is_configuration_error() {
        let err = Santander::new()
            .document_composite(&slip().with_wallet("103"))
            .unwrap_err();
        assert!(matches!(
            err,
            BoletoError::Configuration(ConfigurationError::UnsupportedWallet { ref wallet, .. })
                if wallet == "103"
        ));

        assert!(matches!(
            Santander::from_settings(&BankSettings::default().with_wallet("201")),
            Err(ConfigurationError::UnsupportedWallet { .. })
        ));
    }

    #[test]
    fn test_document_number_too_wide_for_wallet() {
        let slip = PaymentSlip::new("282033", "12345678", "59").with_wallet("102");
        assert!(matches!(
            Santander::new().document_composite(&slip),
            Err(BoletoError::FieldWidth(ref e)) if e.width == 7
        ));
    }

    #[test]
    fn test_printable_agreement_and_account() {
        assert_eq!(
            Santander::new().printable_agreement_and_account(&slip()).unwrap(),
            "59/0282033"
        );
        let slip = PaymentSlip::new("1899775", "272", "0059");
        assert_eq!(
            Santander::new().printable_agreement_and_account(&slip).unwrap(),
            "0059/1899775"
        );
        let slip = PaymentSlip::new("282033", "272", "12345");
        assert!(Santander::new().printable_agreement_and_account(&slip).is_err());
    }

    #[test]
    fn test_issuance_setting_rejected() {
        assert!(Santander::from_settings(&BankSettings::default().with_issuance("4")).is_err());
    }
}
