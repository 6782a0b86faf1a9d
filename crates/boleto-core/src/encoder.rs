//! Slip encoding: runs a slip through a bank variant and the barcode
//! assembler and collects everything the renderer prints.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::banks::BankVariant;
use crate::barcode::{self, Barcode, TypeableLine};
use crate::error::Result;
use crate::models::slip::PaymentSlip;

/// Everything derived from a slip for one bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedSlip {
    /// Selector of the variant that produced this output.
    pub bank: String,
    pub bank_code: String,
    pub bank_code_check_digit: String,
    /// Bank code and check digit as printed, e.g. `033-7`.
    pub bank_display: String,
    pub barcode: Barcode,
    pub typeable_line: TypeableLine,
    pub typeable_line_formatted: String,
    pub agreement_and_account: String,
    pub document_composite: String,
    pub document_composite_check_digit: u8,
    /// Nosso número as printed.
    pub our_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_place: Option<String>,
    pub payee: String,
    /// Payee address on one line, when one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee_address: Option<String>,
    pub payer: String,
    /// Species (espécie), e.g. `R$`.
    pub species: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
}

/// Encode a slip with the given bank variant.
pub fn encode(slip: &PaymentSlip, variant: &dyn BankVariant) -> Result<EncodedSlip> {
    debug!(bank = variant.name(), "encoding slip");

    let free_field = variant.free_field(slip)?;
    let barcode = barcode::assemble(
        variant.bank_code(),
        slip.currency.code(),
        slip.amount,
        slip.due_date,
        &free_field,
    )?;
    let typeable_line = barcode.typeable_line()?;

    let document_composite = variant.document_composite(slip)?;
    let document_composite_check_digit = variant.document_composite_check_digit(slip)?;

    let encoded = EncodedSlip {
        bank: variant.name().to_string(),
        bank_code: variant.bank_code().to_string(),
        bank_code_check_digit: variant.bank_code_check_digit().to_string(),
        bank_display: variant.bank_display(),
        typeable_line_formatted: typeable_line.formatted(),
        agreement_and_account: variant.printable_agreement_and_account(slip)?,
        our_number: format!("{}-{}", document_composite, document_composite_check_digit),
        document_composite,
        document_composite_check_digit,
        payment_place: variant.payment_place().map(str::to_string),
        payee: slip.payee.name.clone(),
        payee_address: (!slip.payee.address.is_empty()).then(|| slip.payee.address.format()),
        payer: slip.payer.name.clone(),
        species: slip.currency.symbol().to_string(),
        amount: slip.amount,
        barcode,
        typeable_line,
    };

    info!(bank = variant.name(), barcode = %encoded.barcode, "slip encoded");
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banks::{Caixa, GuiaSindicalCaixa, Santander};
    use crate::error::{BoletoError, ConfigurationError};
    use crate::registry;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn union_slip() -> PaymentSlip {
        PaymentSlip::new("000123", "42", "1565")
            .with_wallet("1")
            .with_amount(Decimal::new(12345, 2))
            .with_due_date(date(2008, 2, 1))
    }

    fn santander_slip() -> PaymentSlip {
        PaymentSlip::new("0282033", "272", "0059")
            .with_wallet("102")
            .with_amount(Decimal::new(2550, 2))
            .with_due_date(date(2011, 3, 8))
    }

    #[test]
    fn test_encode_union_dues() {
        let encoded = encode(&union_slip(), &GuiaSindicalCaixa::new()).unwrap();

        assert_eq!(encoded.bank, "guia_sindical_caixa");
        assert_eq!(encoded.bank_display, "104-0");
        assert_eq!(
            encoded.barcode.as_str(),
            "10491376900000123450001236000100040000000427"
        );
        assert_eq!(
            encoded.typeable_line.as_str(),
            "10490001263600010004400000004275137690000012345"
        );
        assert_eq!(
            encoded.typeable_line_formatted,
            "10490.00126 36000.100044 00000.004275 1 37690000012345"
        );
        assert_eq!(encoded.our_number, "14000000000000042-1");
        assert_eq!(encoded.agreement_and_account, "1565/000.000.000.00000-0");
        assert!(encoded.payment_place.is_some());
    }

    #[test]
    fn test_encode_caixa() {
        let slip = PaymentSlip::new("245274", "123456789", "1565")
            .with_amount(Decimal::new(100000, 2))
            .with_due_date(date(2012, 5, 10));
        let encoded = encode(&slip, &Caixa::new()).unwrap();

        assert_eq!(
            encoded.barcode.as_str(),
            "10499532900001000002452740000100041234567895"
        );
        assert_eq!(
            encoded.typeable_line_formatted,
            "10492.45275 40000.100046 12345.678952 9 53290000100000"
        );
        assert_eq!(encoded.agreement_and_account, "1565/245274-0");
        assert_eq!(encoded.payment_place, None);
    }

    #[test]
    fn test_encode_santander() {
        let encoded = encode(&santander_slip(), &Santander::new()).unwrap();

        assert_eq!(encoded.bank_display, "033-7");
        assert_eq!(
            encoded.barcode.as_str(),
            "03396490000000025509028203300000000027200102"
        );
        assert_eq!(
            encoded.typeable_line_formatted,
            "03399.02827 03300.000001 00272.001025 6 49000000002550"
        );
        assert_eq!(encoded.document_composite, "0000272");
        assert_eq!(encoded.our_number, "0000272-0");
        assert_eq!(encoded.agreement_and_account, "0059/0282033");
    }

    #[test]
    fn test_carries_parties_and_species() {
        let mut slip = santander_slip();
        slip.payee.name = "Empresa Exemplo Ltda".to_string();
        slip.payee.address.street = Some("Rua das Flores".to_string());
        slip.payee.address.number = Some("100".to_string());
        slip.payer.name = "Fulano de Tal".to_string();

        let encoded = encode(&slip, &Santander::new()).unwrap();
        assert_eq!(encoded.payee, "Empresa Exemplo Ltda");
        assert_eq!(encoded.payee_address.as_deref(), Some("Rua das Flores, 100"));
        assert_eq!(encoded.payer, "Fulano de Tal");
        assert_eq!(encoded.species, "R$");
        assert_eq!(encoded.amount, Some(Decimal::new(2550, 2)));

        let bare = encode(&santander_slip(), &Santander::new()).unwrap();
        assert_eq!(bare.payee_address, None);
    }

    #[test]
    fn test_open_value_slip_without_due_date() {
        let slip = PaymentSlip::new("0282033", "272", "0059");
        let encoded = encode(&slip, &Santander::new()).unwrap();
        assert_eq!(
            encoded.barcode.as_str(),
            "03394000000000000009028203300000000027200102"
        );
        assert_eq!(encoded.barcode.decode().amount, None);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let variant = registry::builtin().resolve("santander").unwrap();
        let first = encode(&santander_slip(), variant.as_ref()).unwrap();
        let second = encode(&santander_slip(), variant.as_ref()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_lengths_and_round_trip() {
        for (slip, variant) in [
            (union_slip(), registry::builtin().resolve("guia_sindical_caixa").unwrap()),
            (santander_slip(), registry::builtin().resolve("santander").unwrap()),
        ] {
            let encoded = encode(&slip, variant.as_ref()).unwrap();
            assert_eq!(encoded.barcode.as_str().len(), 44);
            assert_eq!(encoded.typeable_line.as_str().len(), 47);
            assert!(encoded.typeable_line.as_str().chars().all(|c| c.is_ascii_digit()));
            assert_eq!(encoded.typeable_line.to_barcode().unwrap(), encoded.barcode);
            assert_eq!(
                TypeableLine::parse(&encoded.typeable_line_formatted).unwrap(),
                encoded.typeable_line
            );
        }
    }

    #[test]
    fn test_unsupported_wallet_surfaces_as_configuration_error() {
        let slip = santander_slip().with_wallet("103");
        assert!(matches!(
            encode(&slip, &Santander::new()),
            Err(BoletoError::Configuration(ConfigurationError::UnsupportedWallet { .. }))
        ));
    }

    #[test]
    fn test_amount_too_large() {
        let slip = santander_slip().with_amount(Decimal::new(100_000_000_000, 0));
        assert!(matches!(
            encode(&slip, &Santander::new()),
            Err(BoletoError::FieldWidth(_))
        ));
    }

    #[test]
    fn test_serializes_to_json() {
        let encoded = encode(&santander_slip(), &Santander::new()).unwrap();
        let json = serde_json::to_value(&encoded).unwrap();
        assert_eq!(json["barcode"], "03396490000000025509028203300000000027200102");
        assert_eq!(json["document_composite_check_digit"], 0);
        assert!(json.get("payment_place").is_none());
    }
}
