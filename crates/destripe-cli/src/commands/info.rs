use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use destripe_core::naming::ProductNames;
use destripe_core::pipeline::config::PipelineConfig;
use destripe_core::plan::{CalibrationPlan, ExposureHeader};

use crate::summary::print_plan_summary;

#[derive(Args)]
pub struct InfoArgs {
    /// Input RAW ACS/WFC image
    pub file: PathBuf,

    /// Plan as if CTE correction were turned off
    #[arg(short = 'c', long)]
    pub no_ctecorr: bool,

    /// Plan as if stripe removal were skipped
    #[arg(long)]
    pub no_destripe: bool,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let exposure = ExposureHeader::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let mut config = PipelineConfig::new(&args.file);
    config.cte_correct = !args.no_ctecorr;
    config.destripe.enabled = !args.no_destripe;
    let plan = CalibrationPlan::resolve(exposure, config.plan_options());

    print_plan_summary(&config, &plan);

    let names = ProductNames::from_raw(&args.file)?;
    println!("  FLT:        {}", names.flt.display());
    if plan.cte.performs() {
        println!("  FLC:        {}", names.flc.display());
    }

    Ok(())
}
