use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use swagmod_core::{generator_config, modify, Mode, ModifyOptions, RenameMapping};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "swagmod")]
#[command(about = "Rewrite a bundled Swagger v2 document into a cleaner code-generation input")]
#[command(version)]
struct Cli {
    /// Input bundled Swagger/OpenAPI v2 JSON file
    #[arg(short, long)]
    input: PathBuf,

    /// Output file for the rewritten document
    #[arg(short, long)]
    output: PathBuf,

    /// Rename-mapping config file (prefix/suffix/inputSuffix, per-operation overrides)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path for the generator config side file (read-modify-written if it exists)
    #[arg(long)]
    open_api_config_output_path: Option<PathBuf>,

    /// Fail on structural anomalies instead of skipping them with a warning
    #[arg(long)]
    strict: bool,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let document = read_json(&cli.input)?;

    let mapping: Option<RenameMapping> = match &cli.config {
        Some(path) => {
            let raw = read_json(path)?;
            Some(
                serde_json::from_value(raw)
                    .with_context(|| format!("Invalid rename mapping: {}", path.display()))?,
            )
        }
        None => None,
    };

    let options = ModifyOptions {
        mode: if cli.strict {
            Mode::Strict
        } else {
            Mode::Lenient
        },
    };

    let result = modify(&document, mapping.as_ref(), &options)
        .map_err(|e| anyhow::Error::from(e).context("Document rewriting failed"))?;

    write_json(&cli.output, &result.document)?;

    if let Some(config_path) = &cli.open_api_config_output_path {
        // Read-modify-write: a pre-existing config keeps its unmanaged keys.
        let existing = match read_json(config_path) {
            Ok(value) => Some(value),
            Err(_) => None,
        };
        let package_name = mapping.as_ref().and_then(|m| m.package_name.as_deref());
        let config = generator_config(&result.refs, existing, package_name);
        write_json(config_path, &config)?;
    }

    Ok(())
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse JSON from: {}", path.display()))
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).context("Failed to write JSON")?;

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;

    Ok(())
}
