//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use boleto_core::models::config::BoletoConfig;
use boleto_core::registry;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "banks.santander.wallet")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, &path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("boleto")
        .join("config.json")
}

fn load_or_default(path: &Path) -> anyhow::Result<BoletoConfig> {
    if path.exists() {
        Ok(BoletoConfig::from_file(path)?)
    } else {
        Ok(BoletoConfig::default())
    }
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }
    let config = load_or_default(path)?;

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, default_path: &Path) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| default_path.to_path_buf());

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = BoletoConfig::default();
    config.save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn lookup<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(json, |current, part| current.get(part))
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let config = load_or_default(path)?;
    let json = serde_json::to_value(&config)?;

    let value = lookup(&json, key)
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;

    match value {
        Value::String(s) => println!("{}", s),
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }

    Ok(())
}

/// Write `value` at the dotted `key`, creating intermediate objects.
fn assign(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let mut current = json;

    for (i, part) in parts.iter().enumerate() {
        let obj = current
            .as_object_mut()
            .ok_or_else(|| anyhow::anyhow!("Cannot set value at non-object path: {}", key))?;

        if i == parts.len() - 1 {
            obj.insert((*part).to_string(), value);
            return Ok(());
        }
        current = obj
            .entry((*part).to_string())
            .or_insert_with(|| Value::Object(Default::default()));
    }

    Ok(())
}

/// Apply `key = value` to the config, reading the value as JSON first and
/// falling back to a plain string.
fn apply(config: &BoletoConfig, key: &str, value: &str) -> anyhow::Result<(BoletoConfig, Value)> {
    let mut candidates = Vec::with_capacity(2);
    if let Ok(parsed) = serde_json::from_str::<Value>(value) {
        candidates.push(parsed);
    }
    candidates.push(Value::String(value.to_string()));

    let mut last_error = None;
    for candidate in candidates {
        let mut json = serde_json::to_value(config)?;
        assign(&mut json, key, candidate.clone())?;

        match serde_json::from_value::<BoletoConfig>(json) {
            Ok(updated) => {
                // Unknown keys deserialize silently; reject them here.
                let written = serde_json::to_value(&updated)?;
                if lookup(&written, key) != Some(&candidate) {
                    anyhow::bail!("Unknown configuration key: {}", key);
                }
                return Ok((updated, candidate));
            }
            Err(e) => last_error = Some(e),
        }
    }

    match last_error {
        Some(e) => anyhow::bail!("Invalid value for {}: {}", key, e),
        None => anyhow::bail!("Invalid value for {}", key),
    }
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let config = load_or_default(path)?;
    let (config, written) = apply(&config, key, value)?;

    for (selector, settings) in &config.banks {
        registry::builtin().resolve_with(selector, settings)?;
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&written)?
    );

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'boleto config init' to create a configuration file.");
    }

    Ok(())
}
