use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use destripe_core::batch::{discover_raw_files, run_batch};
use destripe_core::calibrate::ExternalBackend;
use destripe_core::pipeline::config::PipelineConfig;
use tracing::info;

use super::run::{load_config, CalibrationArgs};
use crate::progress::SpinnerReporter;
use crate::summary::print_output;

#[derive(Args)]
pub struct BatchArgs {
    /// Directory to scan for *raw.fits files
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Run config file (TOML); its input is ignored
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of exposures calibrated concurrently
    #[arg(short, long, default_value = "1")]
    pub jobs: usize,

    #[command(flatten)]
    pub calibration: CalibrationArgs,
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let mut template = match args.config {
        Some(ref path) => load_config(path)?,
        None => PipelineConfig::new(args.dir.clone()),
    };
    args.calibration.apply(&mut template);

    let files = discover_raw_files(&args.dir)
        .with_context(|| format!("Failed to scan {}", args.dir.display()))?;
    if files.is_empty() {
        println!("No *raw.fits files found in {}", args.dir.display());
        return Ok(());
    }
    println!("Calibrating {} exposure(s) from {}", files.len(), args.dir.display());

    let backend = Arc::new(ExternalBackend::new(template.tools.clone()));
    let reporter = Arc::new(SpinnerReporter::new()?);
    let items = run_batch(&template, &files, backend, reporter.clone(), args.jobs);
    reporter.finish();
    let items = items?;

    let mut failed = 0;
    for item in &items {
        match item.result {
            Ok(ref output) => print_output(output),
            Err(ref e) => {
                failed += 1;
                eprintln!("{}: {e}", item.input.display());
            }
        }
    }

    info!(failed, total = items.len(), "Batch finished");
    if failed > 0 {
        anyhow::bail!("{failed} of {} exposure(s) failed", items.len());
    }
    Ok(())
}
