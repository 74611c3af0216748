use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use destripe_core::calibrate::ExternalBackend;
use destripe_core::pipeline::config::PipelineConfig;
use destripe_core::pipeline::run_pipeline_reported;
use destripe_core::plan::{CalibrationPlan, ExposureHeader};

use crate::progress::SpinnerReporter;
use crate::summary::{print_output, print_plan_summary};

/// Switches shared by `run` and `batch`.
#[derive(Args, Clone)]
pub struct CalibrationArgs {
    /// Mask file for SCI,1 used during stripe removal
    #[arg(long)]
    pub sci1_mask: Option<PathBuf>,

    /// Mask file for SCI,2 used during stripe removal
    #[arg(long)]
    pub sci2_mask: Option<PathBuf>,

    /// Turn CTE correction off
    #[arg(short = 'c', long)]
    pub no_ctecorr: bool,

    /// Skip stripe removal
    #[arg(long)]
    pub no_destripe: bool,

    /// Keep the *_blv_tmp / *_blc_tmp intermediates
    #[arg(long)]
    pub keep_intermediates: bool,

    /// Maximum sigma-clipping iterations for stripe removal
    #[arg(long)]
    pub maxiter: Option<u32>,

    /// Sigma rejection threshold for stripe removal
    #[arg(long)]
    pub sigrej: Option<f64>,

    /// Command used for acsccd
    #[arg(long)]
    pub acsccd: Option<String>,

    /// Command used for acs_destripe
    #[arg(long)]
    pub acs_destripe: Option<String>,

    /// Command used for acscte
    #[arg(long)]
    pub acscte: Option<String>,

    /// Command used for acs2d
    #[arg(long)]
    pub acs2d: Option<String>,
}

impl CalibrationArgs {
    /// Layer command-line switches over `config`. Flags only ever turn
    /// things off or replace values, so a config file stays authoritative
    /// for anything not given.
    pub fn apply(&self, config: &mut PipelineConfig) {
        if self.sci1_mask.is_some() {
            config.masks.sci1 = self.sci1_mask.clone();
        }
        if self.sci2_mask.is_some() {
            config.masks.sci2 = self.sci2_mask.clone();
        }
        if self.no_ctecorr {
            config.cte_correct = false;
        }
        if self.no_destripe {
            config.destripe.enabled = false;
        }
        if self.keep_intermediates {
            config.keep_intermediates = true;
        }
        if let Some(maxiter) = self.maxiter {
            config.destripe.maxiter = maxiter;
        }
        if let Some(sigrej) = self.sigrej {
            config.destripe.sigrej = sigrej;
        }
        let tools = &mut config.tools;
        for (arg, slot) in [
            (&self.acsccd, &mut tools.ccd),
            (&self.acs_destripe, &mut tools.destripe),
            (&self.acscte, &mut tools.cte),
            (&self.acs2d, &mut tools.calibrate_2d),
        ] {
            if let Some(cmd) = arg {
                *slot = cmd.clone();
            }
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Input RAW ACS/WFC image, e.g. jc5001soq_raw.fits
    #[arg(required_unless_present = "config")]
    pub file: Option<PathBuf>,

    /// Run config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub calibration: CalibrationArgs,
}

pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents).context("Invalid run config")
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = match (&args.config, &args.file) {
        (Some(path), file) => {
            let mut config = load_config(path)?;
            if let Some(file) = file {
                config.input = file.clone();
            }
            config
        }
        (None, Some(file)) => PipelineConfig::new(file),
        (None, None) => {
            anyhow::bail!("No input file given (example: destripe-plus run jc5001soq_raw.fits)")
        }
    };
    args.calibration.apply(&mut config);

    // Show the plan up front when the header is readable; the pipeline
    // reports missing or malformed input itself.
    if let Ok(exposure) = ExposureHeader::read(&config.input) {
        let plan = CalibrationPlan::resolve(exposure, config.plan_options());
        print_plan_summary(&config, &plan);
    }

    let backend = Arc::new(ExternalBackend::new(config.tools.clone()));
    let reporter = Arc::new(SpinnerReporter::new()?);
    let result = run_pipeline_reported(&config, backend, reporter.clone());
    reporter.finish();

    let output = result
        .with_context(|| format!("Calibration of {} failed", config.input.display()))?;
    print_output(&output);

    Ok(())
}
