use std::path::PathBuf;

use serde::Serialize;

use crate::plan::CalibrationPlan;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Validating,
    ReadingHeader,
    ReadoutCorrection,
    Destriping,
    HeaderUpdate,
    CteCorrection,
    FinalCalibration,
    Cleanup,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validating => write!(f, "Checking input"),
            Self::ReadingHeader => write!(f, "Reading header"),
            Self::ReadoutCorrection => write!(f, "Readout correction"),
            Self::Destriping => write!(f, "Destriping"),
            Self::HeaderUpdate => write!(f, "Updating header"),
            Self::CteCorrection => write!(f, "CTE correction"),
            Self::FinalCalibration => write!(f, "Final calibration"),
            Self::Cleanup => write!(f, "Removing intermediates"),
        }
    }
}

/// Products of one calibrated exposure.
#[derive(Clone, Debug, Serialize)]
pub struct PipelineOutput {
    pub flt: PathBuf,
    /// Present only when CTE correction ran.
    pub flc: Option<PathBuf>,
    pub plan: CalibrationPlan,
}

impl PipelineOutput {
    /// Final report lines, e.g. `FLT : j_flt.fits`.
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("FLT : {}", self.flt.display())];
        if let Some(ref flc) = self.flc {
            lines.push(format!("FLC : {}", flc.display()));
        }
        lines
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive spinners, logging, or any other UI
/// feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started for the exposure at `input`.
    fn begin_stage(&self, _input: &std::path::Path, _stage: PipelineStage) {}

    /// The current stage is finished.
    fn finish_stage(&self, _input: &std::path::Path) {}
}

/// No-op progress reporter, used when `run_pipeline` delegates.
pub(crate) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
