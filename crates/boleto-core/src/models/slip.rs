//! Payment slip data model.

use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A payment slip as supplied by the caller.
///
/// Derived values (barcode, typeable line, document composite) are computed
/// on demand by a bank variant and never stored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentSlip {
    /// Payee (cedente / beneficiário).
    pub payee: Party,

    /// Payer (sacado / pagador).
    pub payer: Party,

    /// Guarantor (sacador/avalista).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guarantor: Option<Party>,

    /// Face value. Absent for open-value slips.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    /// Currency of the amount.
    #[serde(default)]
    pub currency: Currency,

    /// Payment due date. Absent means payable on presentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Date the document was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,

    /// Date the slip was processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_date: Option<NaiveDate>,

    /// Banking identifiers.
    pub bank: BankIdentifiers,

    /// Instructions to the cashier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Demonstrative text shown to the payer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demonstrative: Option<String>,

    /// Payee logo, passed through to the renderer untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<PathBuf>,

    /// Union-dues (guia sindical) display data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub union_dues: Option<UnionDues>,
}

/// Identifiers assigned by the bank to the payee and to this slip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankIdentifiers {
    /// Wallet (carteira). Falls back to the variant's default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<String>,

    /// Agreement number (convênio / código do cedente).
    pub agreement: String,

    /// Document number (source of the nosso número).
    pub document_number: String,

    /// Agency code.
    pub agency: String,

    /// Account code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

/// Currency the slip is denominated in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    /// Brazilian real.
    #[default]
    Real,
}

impl Currency {
    /// Single-digit currency code in the barcode.
    pub fn code(&self) -> char {
        match self {
            Self::Real => '9',
        }
    }

    /// Currency for a barcode's currency code.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '9' => Some(Self::Real),
            _ => None,
        }
    }

    /// Species shown on the slip.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Real => "R$",
        }
    }
}

/// A party (payee, payer or guarantor).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Party {
    /// Full name.
    pub name: String,

    /// CPF or CNPJ.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,

    /// Postal address.
    #[serde(default)]
    pub address: Address,
}

/// Brazilian postal address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,

    /// Neighbourhood (bairro).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,

    /// CEP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Two-letter state code (UF).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Address {
    /// Check if the address has any data.
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.district.is_none()
            && self.postal_code.is_none()
            && self.city.is_none()
    }

    /// Format address as a single line.
    pub fn format(&self) -> String {
        let mut street = Vec::new();
        for part in [&self.street, &self.number, &self.complement].into_iter().flatten() {
            street.push(part.as_str());
        }

        let mut parts = Vec::new();
        if !street.is_empty() {
            parts.push(street.join(", "));
        }
        if let Some(district) = &self.district {
            parts.push(district.clone());
        }
        match (&self.city, &self.state) {
            (Some(city), Some(state)) => parts.push(format!("{}/{}", city, state)),
            (Some(city), None) => parts.push(city.clone()),
            (None, Some(state)) => parts.push(state.clone()),
            (None, None) => {}
        }
        if let Some(cep) = &self.postal_code {
            parts.push(format!("CEP {}", cep));
        }
        parts.join(" - ")
    }
}

/// Display data carried by union-dues slips.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnionDues {
    /// Entity type (1 union, 2 federation, 3 confederation, 4 central).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    /// Union code, printed as `NNNNN-D`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub union_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub central_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub confederation_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub federation_code: Option<String>,

    /// Three-digit economic activity code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_code: Option<String>,

    /// Contributor category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Reference period (competência).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competence: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_capital: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub establishment_capital: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributor_employees: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub establishment_employees: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributor_remuneration: Option<Decimal>,
}

impl PaymentSlip {
    /// Create a slip with the banking identifiers set and everything else empty.
    pub fn new(
        agreement: impl Into<String>,
        document_number: impl Into<String>,
        agency: impl Into<String>,
    ) -> Self {
        Self {
            bank: BankIdentifiers {
                agreement: agreement.into(),
                document_number: document_number.into(),
                agency: agency.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Set the wallet.
    pub fn with_wallet(mut self, wallet: impl Into<String>) -> Self {
        self.bank.wallet = Some(wallet.into());
        self
    }

    /// Set the face value.
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the due date.
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_address_format() {
        let addr = Address {
            street: Some("Rua das Flores".to_string()),
            number: Some("100".to_string()),
            complement: None,
            district: Some("Centro".to_string()),
            postal_code: Some("01001-000".to_string()),
            city: Some("São Paulo".to_string()),
            state: Some("SP".to_string()),
        };
        assert_eq!(
            addr.format(),
            "Rua das Flores, 100 - Centro - São Paulo/SP - CEP 01001-000"
        );
        assert!(!addr.is_empty());
        assert!(Address::default().is_empty());
    }

    #[test]
    fn test_currency_code() {
        assert_eq!(Currency::Real.code(), '9');
        assert_eq!(Currency::default().symbol(), "R$");
        assert_eq!(Currency::from_code('9'), Some(Currency::Real));
        assert_eq!(Currency::from_code('0'), None);
    }

    #[test]
    fn test_slip_deserializes_minimal_json() {
        let json = r#"{
            "payee": {"name": "Sindicato"},
            "payer": {"name": "Empresa"},
            "amount": "123.45",
            "due_date": "2008-02-01",
            "bank": {"agreement": "123", "document_number": "42", "agency": "1565"}
        }"#;
        let slip: PaymentSlip = serde_json::from_str(json).unwrap();
        assert_eq!(slip.amount, Some(Decimal::new(12345, 2)));
        assert_eq!(slip.due_date, NaiveDate::from_ymd_opt(2008, 2, 1));
        assert_eq!(slip.bank.wallet, None);
        assert_eq!(slip.currency, Currency::Real);
    }

    #[test]
    fn test_builder_helpers() {
        let slip = PaymentSlip::new("0282033", "272", "0059").with_wallet("102");
        assert_eq!(slip.bank.wallet.as_deref(), Some("102"));
        assert_eq!(slip.bank.document_number, "272");
    }
}
