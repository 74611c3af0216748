use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::calibrate::CalibrationBackend;
use crate::consts::{KEYWORD_PCTECORR, SWITCH_PERFORM};
use crate::error::{DestripeError, Result};
use crate::fits::update_primary_str;
use crate::naming::ProductNames;
use crate::plan::{CalibrationPlan, CteDecision, ExposureHeader};

use super::config::PipelineConfig;
use super::types::{NoOpReporter, PipelineOutput, PipelineStage, ProgressReporter};

/// Fail unless an external stage left `path` behind.
fn expect_product(path: &Path, stage: &str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(DestripeError::Pipeline(format!(
            "{stage} did not produce {}",
            path.display()
        )))
    }
}

fn remove_intermediate(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed intermediate"),
        Err(e) => warn!(path = %path.display(), error = %e, "Could not remove intermediate"),
    }
}

/// Run one exposure through the calibration sequence with a progress reporter.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    backend: Arc<dyn CalibrationBackend>,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<PipelineOutput> {
    let input = config.input.as_path();
    let stage = |s: PipelineStage| reporter.begin_stage(input, s);
    let done = || reporter.finish_stage(input);

    stage(PipelineStage::Validating);
    if !input.is_file() {
        return Err(DestripeError::MissingInput(input.to_path_buf()));
    }
    if config.destripe.enabled {
        if let Some(mask) = config.masks.iter().find(|m| !m.is_file()) {
            return Err(DestripeError::MissingMask(mask.clone()));
        }
    }
    let names = ProductNames::from_raw(input)?;
    done();

    stage(PipelineStage::ReadingHeader);
    let exposure = ExposureHeader::read(input)?;
    let plan = CalibrationPlan::resolve(exposure, config.plan_options());
    info!(
        input = %input.display(),
        subarray = plan.header.subarray,
        aperture = %plan.header.aperture,
        pctecorr = %plan.header.pctecorr,
        backend = backend.name(),
        "Planned calibration"
    );
    if let CteDecision::UnsupportedSubarray(_) | CteDecision::NotRequested(_) = plan.cte {
        warn!("{}", plan.cte);
    }
    done();

    stage(PipelineStage::ReadoutCorrection);
    backend.ccd(input)?;
    expect_product(&names.blv_tmp, "acsccd")?;
    done();

    if plan.destripe {
        stage(PipelineStage::Destriping);
        backend.destripe(&names.blv_tmp, &config.destripe, &config.masks)?;
        let destriped = names.destriped(&config.destripe.suffix);
        expect_product(&destriped, "acs_destripe")?;
        fs::rename(&destriped, &names.blv_tmp)?;
        debug!(from = %destriped.display(), to = %names.blv_tmp.display(), "Replaced intermediate");
        done();
    }

    if plan.force_pctecorr {
        stage(PipelineStage::HeaderUpdate);
        update_primary_str(&names.blv_tmp, KEYWORD_PCTECORR, SWITCH_PERFORM)?;
        done();
    }

    let cte_ran = plan.cte.performs();
    if cte_ran {
        stage(PipelineStage::CteCorrection);
        backend.cte(&names.blv_tmp)?;
        expect_product(&names.blc_tmp, "acscte")?;
        done();
    }

    stage(PipelineStage::FinalCalibration);
    backend.calibrate_2d(&names.blv_tmp)?;
    expect_product(&names.flt, "acs2d")?;
    if cte_ran {
        backend.calibrate_2d(&names.blc_tmp)?;
        expect_product(&names.flc, "acs2d")?;
    }
    done();

    if !config.keep_intermediates {
        stage(PipelineStage::Cleanup);
        remove_intermediate(&names.blv_tmp);
        if cte_ran {
            remove_intermediate(&names.blc_tmp);
        }
        done();
    }

    info!(flt = %names.flt.display(), cte = cte_ran, "Calibration complete");
    Ok(PipelineOutput {
        flt: names.flt,
        flc: cte_ran.then_some(names.flc),
        plan,
    })
}

/// Run one exposure through the calibration sequence.
pub fn run_pipeline(
    config: &PipelineConfig,
    backend: Arc<dyn CalibrationBackend>,
) -> Result<PipelineOutput> {
    run_pipeline_reported(config, backend, Arc::new(NoOpReporter))
}
