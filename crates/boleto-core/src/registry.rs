//! Registry mapping bank selectors to variant constructors.
//!
//! The built-in registry is created once, on first use, and never mutated
//! afterwards. Callers that need extra banks build their own
//! [`VariantRegistry`] and register constructors on it before sharing it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use tracing::debug;

use crate::banks::{BankVariant, Caixa, GuiaSindicalCaixa, Santander};
use crate::error::ConfigurationError;
use crate::models::config::{BankSettings, BoletoConfig};

/// Builds a variant from bank settings.
pub type VariantConstructor = Arc<
    dyn Fn(&BankSettings) -> Result<Arc<dyn BankVariant>, ConfigurationError> + Send + Sync,
>;

lazy_static! {
    static ref BUILTIN: VariantRegistry = VariantRegistry::with_builtin_banks();
}

/// The process-wide registry of built-in banks.
pub fn builtin() -> &'static VariantRegistry {
    &BUILTIN
}

/// Selector → constructor mapping.
#[derive(Clone, Default)]
pub struct VariantRegistry {
    constructors: BTreeMap<String, VariantConstructor>,
    aliases: BTreeMap<String, String>,
}

impl VariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with Caixa, the Caixa union-dues slip and Santander.
    pub fn with_builtin_banks() -> Self {
        let mut registry = Self::new();

        registry.register("caixa", |settings| {
            Ok(Arc::new(Caixa::from_settings(settings)?) as Arc<dyn BankVariant>)
        });
        registry.register("guia_sindical_caixa", |settings| {
            Ok(Arc::new(GuiaSindicalCaixa::from_settings(settings)?) as Arc<dyn BankVariant>)
        });
        registry.register("santander", |settings| {
            Ok(Arc::new(Santander::from_settings(settings)?) as Arc<dyn BankVariant>)
        });

        registry.alias("104", "caixa");
        registry.alias("caixa_sindical", "guia_sindical_caixa");
        registry.alias("033", "santander");

        registry
    }

    /// Register a constructor under a selector, replacing any previous one.
    pub fn register<F>(&mut self, selector: &str, constructor: F)
    where
        F: Fn(&BankSettings) -> Result<Arc<dyn BankVariant>, ConfigurationError>
            + Send
            + Sync
            + 'static,
    {
        self.constructors
            .insert(normalize(selector), Arc::new(constructor));
    }

    /// Make `alias` resolve to the variant registered as `target`.
    pub fn alias(&mut self, alias: &str, target: &str) {
        self.aliases.insert(normalize(alias), normalize(target));
    }

    /// Build the variant for `selector` with its default settings.
    pub fn resolve(&self, selector: &str) -> Result<Arc<dyn BankVariant>, ConfigurationError> {
        self.resolve_with(selector, &BankSettings::default())
    }

    /// Build the variant for `selector` with the given settings.
    pub fn resolve_with(
        &self,
        selector: &str,
        settings: &BankSettings,
    ) -> Result<Arc<dyn BankVariant>, ConfigurationError> {
        let key = self.canonical(selector);
        let constructor = self
            .constructors
            .get(&key)
            .ok_or_else(|| ConfigurationError::UnknownBank(selector.to_string()))?;

        debug!(selector, variant = %key, "resolving bank variant");
        constructor(settings)
    }

    /// Registered selectors, aliases excluded.
    pub fn selectors(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Aliases pointing at `selector`.
    pub fn aliases_of(&self, selector: &str) -> Vec<&str> {
        let key = normalize(selector);
        self.aliases
            .iter()
            .filter(|(_, target)| **target == key)
            .map(|(alias, _)| alias.as_str())
            .collect()
    }

    /// Check whether a selector or alias is registered.
    pub fn contains(&self, selector: &str) -> bool {
        self.constructors.contains_key(&self.canonical(selector))
    }

    /// The registered selector `selector` stands for, aliases followed.
    pub fn canonical(&self, selector: &str) -> String {
        let key = normalize(selector);
        self.aliases.get(&key).cloned().unwrap_or(key)
    }

    /// Settings configured for the bank `selector` names.
    ///
    /// Settings stored under the canonical selector win over settings stored
    /// under one of its aliases.
    pub fn settings_for(&self, config: &BoletoConfig, selector: &str) -> BankSettings {
        let key = self.canonical(selector);
        let mut via_alias = None;

        for (configured, settings) in &config.banks {
            if normalize(configured) == key {
                return settings.clone();
            }
            if via_alias.is_none() && self.canonical(configured) == key {
                via_alias = Some(settings);
            }
        }

        via_alias.cloned().unwrap_or_default()
    }

    /// Build the variant for `selector` with the settings `config` holds for it.
    pub fn resolve_configured(
        &self,
        config: &BoletoConfig,
        selector: &str,
    ) -> Result<Arc<dyn BankVariant>, ConfigurationError> {
        self.resolve_with(selector, &self.settings_for(config, selector))
    }
}

impl fmt::Debug for VariantRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantRegistry")
            .field("selectors", &self.selectors())
            .field("aliases", &self.aliases)
            .finish()
    }
}

fn normalize(selector: &str) -> String {
    selector.trim().to_ascii_lowercase().replace('-', "_")
}
