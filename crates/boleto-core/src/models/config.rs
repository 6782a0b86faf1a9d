//! Configuration structures for the boleto engine and CLI.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoletoConfig {
    /// Bank selector used when none is given explicitly.
    pub default_bank: String,

    /// Per-bank overrides, keyed by selector.
    pub banks: BTreeMap<String, BankSettings>,

    /// Output configuration.
    pub output: OutputConfig,
}

impl Default for BoletoConfig {
    fn default() -> Self {
        Self {
            default_bank: "santander".to_string(),
            banks: BTreeMap::new(),
            output: OutputConfig::default(),
        }
    }
}

/// Overrides for a bank variant's built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankSettings {
    /// Default wallet (carteira).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<String>,

    /// Issuance code (emissão).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuance: Option<String>,

    /// Prefix placed before the document number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl BankSettings {
    pub fn with_wallet(mut self, wallet: impl Into<String>) -> Self {
        self.wallet = Some(wallet.into());
        self
    }

    pub fn with_issuance(mut self, issuance: impl Into<String>) -> Self {
        self.issuance = Some(issuance.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format.
    pub format: OutputFormat,

    /// Print the typeable line with block separators.
    pub formatted_line: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            formatted_line: true,
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Text,
}

impl BoletoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Settings stored under exactly this selector, or defaults.
    ///
    /// Aliases are not followed; use `VariantRegistry::settings_for` to find
    /// settings for whichever selector names the same bank.
    pub fn bank_settings(&self, selector: &str) -> BankSettings {
        let key = selector.trim().to_ascii_lowercase().replace('-', "_");
        self.banks
            .iter()
            .find(|(configured, _)| configured.trim().to_ascii_lowercase().replace('-', "_") == key)
            .map(|(_, settings)| settings.clone())
            .unwrap_or_default()
    }
}
