//! Command line entry point.
//!
//! Converts one PDF or image into a print-ready PDF next to the input.

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use magic_zebra_lib::config::AppConfig;
use magic_zebra_lib::config::app_config::Overrides;
use magic_zebra_lib::services::{self, FileWriter, PrintSubmitter};

/// Normalize a PDF or image for a continuous-roll label printer.
#[derive(Parser, Debug)]
#[command(name = "magic-zebra")]
#[command(version, about, long_about = None)]
struct Args {
    /// PDF or image file to convert
    input: PathBuf,

    /// Output file (default: `<name>_print.pdf` next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Content width in millimetres
    #[arg(short = 'w', long = "width-mm")]
    width_mm: Option<f64>,

    /// Right margin in millimetres
    #[arg(short = 'm', long = "margin-mm")]
    margin_mm: Option<f64>,

    /// Raster density for image inputs, in DPI
    #[arg(long)]
    density: Option<u32>,

    /// Monochrome mode for image inputs: threshold, dither or none
    #[arg(long)]
    mono: Option<String>,

    /// Compute and report geometry without writing output
    #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Print a JSON report on stdout
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);
    magic_zebra_lib::load_dotenv();

    let overrides = Overrides {
        content_width_mm: args.width_mm,
        right_margin_mm: args.margin_mm,
        density: args.density,
        mono: args.mono.clone(),
    };
    let config = AppConfig::load()
        .and_then(|c| c.with_overrides(&overrides))
        .context("Invalid configuration")?;
    tracing::debug!(?config, "Configuration resolved");

    let mut conversion = services::convert(&args.input, &config)?;

    let output = if args.dry_run {
        None
    } else {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| services::output_path(&args.input));
        let writer = FileWriter::new(path);
        Some(writer.submit(&conversion.job, &mut conversion.document)?)
    };

    if args.json {
        let report = conversion.report(&args.input, output.as_deref());
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for page in &conversion.pages {
            println!("{}", page.description);
        }
        match &output {
            Some(path) => println!("{} ({})", path.display(), conversion.job.page_size()),
            None => println!("dry run: {}", conversion.job.page_size()),
        }
    }

    let failures = conversion.failures();
    if failures > 0 {
        tracing::warn!(failures, "Output checks failed; see warnings above");
    }
    Ok(())
}
