//! Decode command - validate a barcode or typeable line and show its fields.

use chrono::{Local, NaiveDate};
use clap::Args;
use console::style;
use rust_decimal::Decimal;
use serde::Serialize;

use boleto_core::barcode::{factor_to_date, BARCODE_LEN};
use boleto_core::models::Currency;
use boleto_core::{registry, Barcode, TypeableLine};

use super::OutputFormat;

/// Arguments for the decode command.
#[derive(Args)]
pub struct DecodeArgs {
    /// Barcode (44 digits) or typeable line (47 digits, separators allowed)
    #[arg(required = true)]
    input: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// Fields recovered from a barcode.
#[derive(Debug, Serialize)]
struct Decoded {
    barcode: String,
    typeable_line: String,
    bank_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    bank: Option<&'static str>,
    currency_code: char,
    due_factor: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<Decimal>,
    free_field: String,
}

pub fn run(args: DecodeArgs) -> anyhow::Result<()> {
    let barcode = parse_input(&args.input)?;
    let decoded = decode(&barcode)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&decoded)?),
        OutputFormat::Csv => print!("{}", format_csv(&decoded)?),
        OutputFormat::Text => print_text(&decoded),
    }

    Ok(())
}

/// Accept either a barcode or a typeable line.
fn parse_input(input: &str) -> anyhow::Result<Barcode> {
    let barcode = if input.trim().len() == BARCODE_LEN {
        Barcode::parse(input)?
    } else {
        TypeableLine::parse(input)?.to_barcode()?
    };
    Ok(barcode)
}

fn decode(barcode: &Barcode) -> anyhow::Result<Decoded> {
    let fields = barcode.decode();
    let due_date = match fields.due_factor {
        0 => None,
        factor => factor_to_date(factor, Local::now().date_naive()),
    };
    let bank = registry::builtin()
        .resolve(&fields.bank_code)
        .ok()
        .map(|variant| variant.name());

    Ok(Decoded {
        barcode: barcode.to_string(),
        typeable_line: barcode.typeable_line()?.formatted(),
        bank_code: fields.bank_code,
        bank,
        currency_code: fields.currency_code,
        due_factor: fields.due_factor,
        due_date,
        amount: fields.amount,
        free_field: fields.free_field,
    })
}

fn format_csv(decoded: &Decoded) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "barcode",
        "typeable_line",
        "bank_code",
        "due_date",
        "amount",
        "free_field",
    ])?;

    wtr.write_record([
        &decoded.barcode,
        &decoded.typeable_line,
        &decoded.bank_code,
        &decoded.due_date.map(|d| d.to_string()).unwrap_or_default(),
        &decoded.amount.map(|a| a.to_string()).unwrap_or_default(),
        &decoded.free_field,
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn print_text(decoded: &Decoded) {
    println!("{} Valid barcode", style("✓").green());
    println!();
    println!("Barcode:       {}", decoded.barcode);
    println!("Typeable line: {}", decoded.typeable_line);
    match decoded.bank {
        Some(name) => println!("Bank:          {} ({})", decoded.bank_code, name),
        None => println!("Bank:          {}", decoded.bank_code),
    }
    match decoded.due_date {
        Some(date) => println!("Due date:      {} (factor {})", date, decoded.due_factor),
        None => println!("Due date:      on presentation"),
    }
    match decoded.amount {
        Some(amount) => {
            let species = Currency::from_code(decoded.currency_code).map_or("", |c| c.symbol());
            println!("Amount:        {} {}", species, amount)
        }
        None => println!("Amount:        open"),
    }
    println!("Free field:    {}", decoded.free_field);
}
