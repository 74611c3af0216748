//! Calibrate every RAW exposure in a directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{error, info};

use crate::calibrate::CalibrationBackend;
use crate::consts::RAW_FILE_ENDING;
use crate::error::{DestripeError, Result};
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::{run_pipeline_reported, PipelineOutput, ProgressReporter};

/// Result of one exposure in a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub input: PathBuf,
    pub result: Result<PipelineOutput>,
}

/// RAW exposures (`*raw.fits`) directly inside `dir`, sorted by name.
pub fn discover_raw_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_raw = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(RAW_FILE_ENDING));
        if is_raw && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Run `template` against each file. A failure is recorded and the batch
/// moves on. `jobs > 1` processes exposures concurrently.
pub fn run_batch(
    template: &PipelineConfig,
    files: &[PathBuf],
    backend: Arc<dyn CalibrationBackend>,
    reporter: Arc<dyn ProgressReporter>,
    jobs: usize,
) -> Result<Vec<BatchItem>> {
    info!(files = files.len(), jobs, "Starting batch");

    let run_one = |input: &PathBuf| {
        let config = template.for_input(input);
        let result = run_pipeline_reported(&config, backend.clone(), reporter.clone());
        if let Err(ref e) = result {
            error!(input = %input.display(), error = %e, "Exposure failed");
        }
        BatchItem {
            input: input.clone(),
            result,
        }
    };

    if jobs <= 1 {
        return Ok(files.iter().map(run_one).collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| DestripeError::Pipeline(format!("failed to start worker pool: {e}")))?;
    Ok(pool.install(|| files.par_iter().map(run_one).collect()))
}
