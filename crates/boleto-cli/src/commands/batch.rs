//! Batch command for encoding multiple slip files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use boleto_core::{encode, BankVariant, EncodedSlip};

use super::encode::{format_encoded, read_slip};
use super::{load_config, output_stem, resolve_variant, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching slip files
    #[arg(required = true)]
    input: String,

    /// Bank selector (default: from config)
    #[arg(short, long)]
    bank: Option<String>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of encoding a single file.
struct EncodeResult {
    path: PathBuf,
    encoded: Option<EncodedSlip>,
    error: Option<String>,
    processing_time_us: u64,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let variant = resolve_variant(&config, args.bank.as_deref())?;
    let format = args.format.unwrap_or_else(|| config.output.format.into());

    // Expand glob pattern
    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        })
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to encode",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = encode_file(&path, variant.as_ref());
        let processing_time_us = file_start.elapsed().as_micros() as u64;

        match result {
            Ok(encoded) => results.push(EncodeResult {
                path,
                encoded: Some(encoded),
                error: None,
                processing_time_us,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to encode {}: {}", path.display(), error_msg);
                    results.push(EncodeResult {
                        path,
                        encoded: None,
                        error: Some(error_msg),
                        processing_time_us,
                    });
                } else {
                    pb.abandon();
                    error!("Failed to encode {}: {}", path.display(), error_msg);
                    anyhow::bail!("Encoding failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.encoded.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(encoded) = &result.encoded {
                let output_path = output_dir.join(format!(
                    "{}.{}",
                    output_stem(&result.path),
                    format.extension()
                ));
                let content = format_encoded(encoded, format, config.output.formatted_line)?;
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Encoded {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn encode_file(path: &Path, variant: &dyn BankVariant) -> anyhow::Result<EncodedSlip> {
    let slip = read_slip(path)?;
    Ok(encode(&slip, variant)?)
}

fn write_summary(path: &Path, results: &[EncodeResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "bank",
        "barcode",
        "typeable_line",
        "our_number",
        "processing_time_us",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time = result.processing_time_us.to_string();

        if let Some(encoded) = &result.encoded {
            wtr.write_record([
                filename,
                "success",
                encoded.bank.as_str(),
                encoded.barcode.as_str(),
                encoded.typeable_line.as_str(),
                encoded.our_number.as_str(),
                time.as_str(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                time.as_str(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
