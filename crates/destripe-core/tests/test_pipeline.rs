mod common;

use std::sync::{Arc, Mutex};

use destripe_core::error::DestripeError;
use destripe_core::fits::read_primary_str;
use destripe_core::pipeline::config::PipelineConfig;
use destripe_core::pipeline::{run_pipeline, run_pipeline_reported, PipelineStage, ProgressReporter};
use destripe_core::plan::CteDecision;

use common::{write_raw, MockBackend};

#[test]
fn test_full_frame_runs_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_raw(dir.path(), "jc5001soq_raw.fits", false, "WFC", "PERFORM");
    let backend = Arc::new(MockBackend::default());

    let output = run_pipeline(&PipelineConfig::new(&raw), backend.clone()).unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            "ccd jc5001soq_raw.fits",
            "destripe jc5001soq_blv_tmp.fits",
            "cte jc5001soq_blv_tmp.fits",
            "2d jc5001soq_blv_tmp.fits",
            "2d jc5001soq_blc_tmp.fits",
        ]
    );
    assert_eq!(output.flt, dir.path().join("jc5001soq_flt.fits"));
    assert_eq!(output.flc, Some(dir.path().join("jc5001soq_flc.fits")));
    assert!(output.flt.is_file());
    assert!(output.flc.as_ref().unwrap().is_file());

    // Intermediates are gone.
    assert!(!dir.path().join("jc5001soq_blv_tmp.fits").exists());
    assert!(!dir.path().join("jc5001soq_blc_tmp.fits").exists());
    assert!(!dir.path().join("jc5001soq_blv_tmp_strp.fits").exists());
    assert!(raw.is_file());

    assert_eq!(
        output.report_lines(),
        vec![
            format!("FLT : {}", output.flt.display()),
            format!("FLC : {}", output.flc.as_ref().unwrap().display()),
        ]
    );
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MockBackend::default());
    let config = PipelineConfig::new(dir.path().join("absent_raw.fits"));

    let err = run_pipeline(&config, backend.clone()).unwrap_err();
    assert!(matches!(err, DestripeError::MissingInput(_)));
    assert!(err.to_string().contains("RAW file does not exist"));
    assert!(backend.calls().is_empty());
}

#[test]
fn test_missing_mask() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_raw(dir.path(), "j_raw.fits", false, "WFC", "PERFORM");
    let mut config = PipelineConfig::new(&raw);
    config.masks.sci2 = Some(dir.path().join("mask2.fits"));

    let err = run_pipeline(&config, Arc::new(MockBackend::default())).unwrap_err();
    assert!(matches!(err, DestripeError::MissingMask(_)));
}

#[test]
fn test_supported_subarray_updates_intermediate_header() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_raw(dir.path(), "j_raw.fits", true, "WFC1-2K", "OMIT");
    let backend = Arc::new(MockBackend::default());
    let mut config = PipelineConfig::new(&raw);
    config.keep_intermediates = true;

    let output = run_pipeline(&config, backend.clone()).unwrap();

    assert!(output.plan.force_pctecorr);
    // CTE follows the RAW header's OMIT even though the intermediate says PERFORM.
    assert_eq!(output.plan.cte, CteDecision::NotRequested("OMIT".into()));
    assert!(output.flc.is_none());
    assert!(!backend.calls().iter().any(|c| c.starts_with("cte")));
    let blv = dir.path().join("j_blv_tmp.fits");
    assert_eq!(read_primary_str(&blv, "PCTECORR").unwrap(), "PERFORM");
    // The RAW file itself is left alone.
    assert_eq!(read_primary_str(&raw, "PCTECORR").unwrap(), "OMIT");
}

#[test]
fn test_supported_subarray_with_perform_runs_cte() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_raw(dir.path(), "j_raw.fits", true, "WFC2-2K", "PERFORM");
    let backend = Arc::new(MockBackend::default());

    let output = run_pipeline(&PipelineConfig::new(&raw), backend.clone()).unwrap();

    assert_eq!(output.plan.cte, CteDecision::Perform);
    assert!(output.flc.as_ref().unwrap().is_file());
    assert!(backend.calls().contains(&"cte j_blv_tmp.fits".to_string()));
}

#[test]
fn test_unsupported_subarray_skips_cte() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_raw(dir.path(), "j_raw.fits", true, "WFC1-1K", "PERFORM");
    let backend = Arc::new(MockBackend::default());

    let output = run_pipeline(&PipelineConfig::new(&raw), backend.clone()).unwrap();

    assert_eq!(output.plan.cte, CteDecision::UnsupportedSubarray("WFC1-1K".into()));
    assert!(output.flc.is_none());
    assert_eq!(output.report_lines().len(), 1);
    assert!(!backend.calls().iter().any(|c| c.starts_with("cte")));
    assert_eq!(read_primary_str(&output.flt, "PCTECORR").unwrap(), "PERFORM");
}

#[test]
fn test_no_ctecorr_and_no_destripe() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_raw(dir.path(), "j_raw.fits", false, "WFC", "PERFORM");
    let backend = Arc::new(MockBackend::default());
    let mut config = PipelineConfig::new(&raw);
    config.cte_correct = false;
    config.destripe.enabled = false;

    let output = run_pipeline(&config, backend.clone()).unwrap();

    assert_eq!(backend.calls(), vec!["ccd j_raw.fits", "2d j_blv_tmp.fits"]);
    assert_eq!(output.plan.cte, CteDecision::Disabled);
    assert!(output.flc.is_none());
}

#[test]
fn test_keep_intermediates() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_raw(dir.path(), "j_raw.fits", false, "WFC", "PERFORM");
    let mut config = PipelineConfig::new(&raw);
    config.keep_intermediates = true;

    run_pipeline(&config, Arc::new(MockBackend::default())).unwrap();

    assert!(dir.path().join("j_blv_tmp.fits").is_file());
    assert!(dir.path().join("j_blc_tmp.fits").is_file());
    // The destriped file always replaces the intermediate.
    assert!(!dir.path().join("j_blv_tmp_strp.fits").exists());
}

#[test]
fn test_stage_failure_stops_run() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_raw(dir.path(), "j_raw.fits", false, "WFC", "PERFORM");
    let backend = Arc::new(MockBackend::failing_on("cte"));

    let err = run_pipeline(&PipelineConfig::new(&raw), backend.clone()).unwrap_err();

    assert!(err.to_string().contains("mock cte failure"));
    assert_eq!(backend.calls().last().unwrap(), "cte j_blv_tmp.fits");
    assert!(!dir.path().join("j_flt.fits").exists());
}

#[test]
fn test_missing_product_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_raw(dir.path(), "j_raw.fits", false, "WFC", "PERFORM");
    let backend = Arc::new(MockBackend {
        skip_output_on: Some("destripe"),
        ..Default::default()
    });

    let err = run_pipeline(&PipelineConfig::new(&raw), backend).unwrap_err();
    assert!(err.to_string().contains("acs_destripe did not produce"), "got: {err}");
}

#[test]
fn test_missing_keyword() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("j_raw.fits");
    common::write_fits(&raw, None, &[("APERTURE", "WFC")]);

    let err = run_pipeline(&PipelineConfig::new(&raw), Arc::new(MockBackend::default())).unwrap_err();
    assert!(matches!(err, DestripeError::MissingKeyword { ref keyword, .. } if keyword == "SUBARRAY"));
}

#[test]
fn test_consumed_intermediate_still_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_raw(dir.path(), "j_raw.fits", false, "WFC", "PERFORM");
    let backend = Arc::new(MockBackend {
        consume_blv_on_2d: true,
        ..Default::default()
    });

    let output = run_pipeline(&PipelineConfig::new(&raw), backend).unwrap();

    assert!(output.flt.is_file());
    assert!(output.flc.as_ref().unwrap().is_file());
    assert!(!dir.path().join("j_blv_tmp.fits").exists());
    assert!(!dir.path().join("j_blc_tmp.fits").exists());
}

#[derive(Default)]
struct RecordingReporter {
    stages: Mutex<Vec<PipelineStage>>,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, _input: &std::path::Path, stage: PipelineStage) {
        self.stages.lock().unwrap().push(stage);
    }
}

#[test]
fn test_reported_stage_order() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_raw(dir.path(), "j_raw.fits", true, "WFC2-2K", "OMIT");
    let reporter = Arc::new(RecordingReporter::default());

    run_pipeline_reported(
        &PipelineConfig::new(&raw),
        Arc::new(MockBackend::default()),
        reporter.clone(),
    )
    .unwrap();

    assert_eq!(
        *reporter.stages.lock().unwrap(),
        vec![
            PipelineStage::Validating,
            PipelineStage::ReadingHeader,
            PipelineStage::ReadoutCorrection,
            PipelineStage::Destriping,
            PipelineStage::HeaderUpdate,
            PipelineStage::FinalCalibration,
            PipelineStage::Cleanup,
        ]
    );
}
