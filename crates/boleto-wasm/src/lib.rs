//! WASM bindings for Brazilian payment slip encoding.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use std::fmt::Display;
use std::sync::Arc;

use wasm_bindgen::prelude::*;

use boleto_core::barcode::factor_to_date;
use boleto_core::models::config::BankSettings;
use boleto_core::{encode, registry, BankVariant, Barcode, PaymentSlip, TypeableLine};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_error(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Encode a slip object with the bank's default settings.
///
/// Returns the barcode, typeable line and display fields.
#[wasm_bindgen]
pub fn encode_slip(slip: JsValue, bank: &str) -> Result<JsValue, JsValue> {
    let variant = registry::builtin().resolve(bank).map_err(js_error)?;
    encode_with(&slip, variant.as_ref())
}

fn encode_with(slip: &JsValue, variant: &dyn BankVariant) -> Result<JsValue, JsValue> {
    let slip: PaymentSlip = serde_wasm_bindgen::from_value(slip.clone()).map_err(js_error)?;
    let encoded = encode(&slip, variant).map_err(js_error)?;

    serde_wasm_bindgen::to_value(&encoded).map_err(js_error)
}

/// Decode a barcode or typeable line into its fields.
#[wasm_bindgen]
pub fn decode(input: &str) -> Result<JsValue, JsValue> {
    let barcode = parse_any(input)?;
    let fields = barcode.decode();

    #[derive(serde::Serialize)]
    struct Decoded {
        barcode: String,
        typeable_line: String,
        #[serde(flatten)]
        fields: boleto_core::BarcodeFields,
    }

    let output = Decoded {
        barcode: barcode.to_string(),
        typeable_line: barcode.typeable_line().map_err(js_error)?.formatted(),
        fields,
    };

    serde_wasm_bindgen::to_value(&output).map_err(js_error)
}

fn parse_any(input: &str) -> Result<Barcode, JsValue> {
    if input.trim().len() == boleto_core::barcode::BARCODE_LEN {
        Barcode::parse(input).map_err(js_error)
    } else {
        TypeableLine::parse(input)
            .and_then(|line| line.to_barcode())
            .map_err(js_error)
    }
}

/// Check a 44-digit barcode's length and general check digit.
#[wasm_bindgen]
pub fn validate_barcode(barcode: &str) -> bool {
    Barcode::parse(barcode).is_ok()
}

/// Convert a typeable line (raw or formatted) back to its barcode.
#[wasm_bindgen]
pub fn typeable_line_to_barcode(line: &str) -> Result<String, JsValue> {
    TypeableLine::parse(line)
        .and_then(|line| line.to_barcode())
        .map(|barcode| barcode.to_string())
        .map_err(js_error)
}

/// Slip encoder bound to one bank, for encoding many slips.
#[wasm_bindgen]
pub struct SlipEncoder {
    variant: Arc<dyn BankVariant>,
}

#[wasm_bindgen]
impl SlipEncoder {
    /// Create an encoder for a bank, optionally overriding its wallet.
    #[wasm_bindgen(constructor)]
    pub fn new(bank: &str, wallet: Option<String>) -> Result<SlipEncoder, JsValue> {
        let settings = BankSettings {
            wallet,
            ..Default::default()
        };
        let variant = registry::builtin()
            .resolve_with(bank, &settings)
            .map_err(js_error)?;
        Ok(Self { variant })
    }

    /// Bank code and check digit, e.g. `104-0`.
    #[wasm_bindgen(getter)]
    pub fn bank_display(&self) -> String {
        self.variant.bank_display()
    }

    /// Encode a slip object.
    #[wasm_bindgen]
    pub fn encode(&self, slip: JsValue) -> Result<JsValue, JsValue> {
        encode_with(&slip, self.variant.as_ref())
    }
}

/// Helpers for displaying slip data.
#[wasm_bindgen]
pub struct BoletoUtils;

#[wasm_bindgen]
impl BoletoUtils {
    /// Format a typeable line as `AAAAA.AAAAA BBBBB.BBBBBB CCCCC.CCCCCC D EEEEEEEEEEEEEE`.
    #[wasm_bindgen]
    pub fn format_typeable_line(line: &str) -> Result<String, JsValue> {
        TypeableLine::parse(line)
            .map(|line| line.formatted())
            .map_err(js_error)
    }

    /// Registered bank selectors.
    #[wasm_bindgen]
    pub fn banks() -> Vec<String> {
        registry::builtin()
            .selectors()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Due date (`YYYY-MM-DD`) for a factor, nearest to the reference date.
    #[wasm_bindgen]
    pub fn due_date_for_factor(factor: u16, reference: &str) -> Option<String> {
        let reference = reference.parse().ok()?;
        factor_to_date(factor, reference).map(|d| d.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const CAIXA_BARCODE: &str = "10499532900001000002452740000100041234567895";
    const CAIXA_LINE: &str = "10492.45275 40000.100046 12345.678952 9 53290000100000";

    #[wasm_bindgen_test]
    fn test_validate_barcode() {
        assert!(validate_barcode(CAIXA_BARCODE));
        assert!(!validate_barcode("10498532900001000002452740000100041234567895"));
        assert!(!validate_barcode("1049"));
    }

    #[wasm_bindgen_test]
    fn test_typeable_line_to_barcode() {
        assert_eq!(typeable_line_to_barcode(CAIXA_LINE).unwrap(), CAIXA_BARCODE);
        assert!(typeable_line_to_barcode(&CAIXA_LINE.replacen('1', "\u{0661}", 1)).is_err());
    }

    #[wasm_bindgen_test]
    fn test_format_typeable_line() {
        let raw: String = CAIXA_LINE.chars().filter(|c| c.is_ascii_digit()).collect();
        assert_eq!(BoletoUtils::format_typeable_line(&raw).unwrap(), CAIXA_LINE);
    }

    #[wasm_bindgen_test]
    fn test_banks() {
        assert_eq!(
            BoletoUtils::banks(),
            vec!["caixa", "guia_sindical_caixa", "santander"]
        );
    }

    #[wasm_bindgen_test]
    fn test_due_date_for_factor() {
        assert_eq!(
            BoletoUtils::due_date_for_factor(3769, "2008-01-01"),
            Some("2008-02-01".to_string())
        );
        assert_eq!(BoletoUtils::due_date_for_factor(3769, "not a date"), None);
    }

    #[wasm_bindgen_test]
    fn test_slip_encoder_display() {
        let encoder = SlipEncoder::new("santander", Some("101".to_string())).unwrap();
        assert_eq!(encoder.bank_display(), "033-7");
        assert!(SlipEncoder::new("santander", Some("103".to_string())).is_err());
    }
}
