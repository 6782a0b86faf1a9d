//! Encode command - turn a slip file into its barcode and typeable line.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::info;

use boleto_core::{encode, EncodedSlip, PaymentSlip};

use super::{load_config, resolve_variant, OutputFormat};

/// Arguments for the encode command.
#[derive(Args)]
pub struct EncodeArgs {
    /// Slip file (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Bank selector (default: from config)
    #[arg(short, long)]
    bank: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

pub fn run(args: EncodeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Encoding slip: {}", args.input.display());

    let variant = resolve_variant(&config, args.bank.as_deref())?;
    let slip = read_slip(&args.input)?;
    let encoded = encode(&slip, variant.as_ref())?;

    let format = args.format.unwrap_or_else(|| config.output.format.into());
    let output = format_encoded(&encoded, format, config.output.formatted_line)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Read a slip from a JSON file.
pub fn read_slip(path: &Path) -> anyhow::Result<PaymentSlip> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid slip {}: {}", path.display(), e))
}

pub fn format_encoded(
    encoded: &EncodedSlip,
    format: OutputFormat,
    formatted_line: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(encoded)?),
        OutputFormat::Csv => format_csv(encoded, formatted_line),
        OutputFormat::Text => Ok(format_text(encoded, formatted_line)),
    }
}

fn typeable_line(encoded: &EncodedSlip, formatted_line: bool) -> &str {
    if formatted_line {
        &encoded.typeable_line_formatted
    } else {
        encoded.typeable_line.as_str()
    }
}

fn format_csv(encoded: &EncodedSlip, formatted_line: bool) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "bank",
        "bank_code",
        "barcode",
        "typeable_line",
        "our_number",
        "agreement_and_account",
    ])?;

    wtr.write_record([
        encoded.bank.as_str(),
        encoded.bank_display.as_str(),
        encoded.barcode.as_str(),
        typeable_line(encoded, formatted_line),
        encoded.our_number.as_str(),
        encoded.agreement_and_account.as_str(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(encoded: &EncodedSlip, formatted_line: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("Bank:          {} ({})\n", encoded.bank_display, encoded.bank));
    output.push_str(&format!("Payee:         {}\n", encoded.payee));
    if let Some(address) = &encoded.payee_address {
        output.push_str(&format!("               {}\n", address));
    }
    output.push_str(&format!("Payer:         {}\n", encoded.payer));
    match encoded.amount {
        Some(amount) => output.push_str(&format!("Amount:        {} {}\n", encoded.species, amount)),
        None => output.push_str(&format!("Amount:        {} (open)\n", encoded.species)),
    }
    output.push_str(&format!("Typeable line: {}\n", typeable_line(encoded, formatted_line)));
    output.push_str(&format!("Barcode:       {}\n", encoded.barcode));
    output.push_str(&format!("Our number:    {}\n", encoded.our_number));
    output.push_str(&format!("Agreement:     {}\n", encoded.agreement_and_account));

    if let Some(place) = &encoded.payment_place {
        output.push_str(&format!("Payment place: {}\n", place));
    }

    output
}
