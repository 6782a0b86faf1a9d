//! Subcommands and the helpers they share.

pub mod banks;
pub mod batch;
pub mod config;
pub mod decode;
pub mod encode;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use boleto_core::models::config::{self as core_config, BoletoConfig};
use boleto_core::{registry, BankVariant};

/// Output format selectable on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

impl From<core_config::OutputFormat> for OutputFormat {
    fn from(format: core_config::OutputFormat) -> Self {
        match format {
            core_config::OutputFormat::Json => Self::Json,
            core_config::OutputFormat::Csv => Self::Csv,
            core_config::OutputFormat::Text => Self::Text,
        }
    }
}

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BoletoConfig> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(config::default_config_path);

    if config_path.is_some() || path.exists() {
        debug!("Loading configuration from {}", path.display());
        BoletoConfig::from_file(&path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
    } else {
        Ok(BoletoConfig::default())
    }
}

/// Resolve the bank to use, applying configured settings.
pub fn resolve_variant(
    config: &BoletoConfig,
    bank: Option<&str>,
) -> anyhow::Result<Arc<dyn BankVariant>> {
    let selector = bank.unwrap_or(&config.default_bank);
    Ok(registry::builtin().resolve_configured(config, selector)?)
}

/// File stem used to name per-slip output files.
pub fn output_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("slip")
}

#[cfg(test)]
mod tests {
    use super::*;
    use boleto_core::PaymentSlip;

    #[test]
    fn test_resolve_variant_uses_settings_for_alias() {
        let config: BoletoConfig =
            serde_json::from_str(r#"{"banks": {"santander": {"wallet": "101"}}}"#).unwrap();
        let slip = PaymentSlip::new("1899775", "1234567", "0059");

        for bank in [None, Some("033"), Some("SANTANDER")] {
            let variant = resolve_variant(&config, bank).unwrap();
            assert_eq!(variant.document_composite(&slip).unwrap(), "00001234567");
        }
    }
}
