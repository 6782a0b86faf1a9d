//! Banks command - list the registered bank variants.

use console::style;

use boleto_core::registry;

use super::load_config;

pub fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = registry::builtin();

    println!("{}", style("Supported banks:").bold());
    println!();

    for selector in registry.selectors() {
        let variant = registry.resolve_configured(&config, selector)?;

        let marker = if selector == registry.canonical(&config.default_bank) {
            style("*").green().to_string()
        } else {
            " ".to_string()
        };

        let aliases = registry.aliases_of(selector);
        let aliases = if aliases.is_empty() {
            String::new()
        } else {
            format!(" (aliases: {})", aliases.join(", "))
        };

        println!(
            "{} {:<22} {}{}",
            marker,
            selector,
            variant.bank_display(),
            style(aliases).dim()
        );
    }

    println!();
    println!("Default bank: {}", config.default_bank);

    Ok(())
}
