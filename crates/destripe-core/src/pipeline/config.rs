use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::calibrate::StripeMasks;
use crate::consts::{
    DEFAULT_2D_TOOL, DEFAULT_CCD_TOOL, DEFAULT_CTE_TOOL, DEFAULT_DESTRIPE_MAXITER,
    DEFAULT_DESTRIPE_SIGREJ, DEFAULT_DESTRIPE_SUFFIX, DEFAULT_DESTRIPE_TOOL,
};
use crate::plan::PlanOptions;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// RAW exposure to calibrate.
    pub input: PathBuf,
    /// Run pixel-based CTE correction when the header allows it.
    #[serde(default = "default_true")]
    pub cte_correct: bool,
    #[serde(default)]
    pub destripe: DestripeConfig,
    #[serde(default)]
    pub masks: StripeMasks,
    /// Leave `*_blv_tmp` / `*_blc_tmp` on disk after the run.
    #[serde(default)]
    pub keep_intermediates: bool,
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl PipelineConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            cte_correct: true,
            destripe: DestripeConfig::default(),
            masks: StripeMasks::default(),
            keep_intermediates: false,
            tools: ToolsConfig::default(),
        }
    }

    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            cte_correct: self.cte_correct,
            destripe: self.destripe.enabled,
        }
    }

    /// Same settings, different exposure.
    pub fn for_input(&self, input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..self.clone()
        }
    }
}

fn default_true() -> bool {
    true
}

/// Parameters handed to the stand-alone destriping tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DestripeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Suffix the tool appends to its output file name.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Maximum number of sigma-clipping iterations.
    #[serde(default = "default_maxiter")]
    pub maxiter: u32,
    /// Rejection threshold in sigma.
    #[serde(default = "default_sigrej")]
    pub sigrej: f64,
    /// Allow the tool to overwrite an existing output.
    #[serde(default)]
    pub clobber: bool,
}

fn default_suffix() -> String {
    DEFAULT_DESTRIPE_SUFFIX.to_string()
}
fn default_maxiter() -> u32 {
    DEFAULT_DESTRIPE_MAXITER
}
fn default_sigrej() -> f64 {
    DEFAULT_DESTRIPE_SIGREJ
}

impl Default for DestripeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            suffix: default_suffix(),
            maxiter: DEFAULT_DESTRIPE_MAXITER,
            sigrej: DEFAULT_DESTRIPE_SIGREJ,
            clobber: false,
        }
    }
}

/// Executable names (or paths) of the external calibration tools.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_ccd_tool")]
    pub ccd: String,
    #[serde(default = "default_destripe_tool")]
    pub destripe: String,
    #[serde(default = "default_cte_tool")]
    pub cte: String,
    #[serde(default = "default_2d_tool")]
    pub calibrate_2d: String,
}

fn default_ccd_tool() -> String {
    DEFAULT_CCD_TOOL.to_string()
}
fn default_destripe_tool() -> String {
    DEFAULT_DESTRIPE_TOOL.to_string()
}
fn default_cte_tool() -> String {
    DEFAULT_CTE_TOOL.to_string()
}
fn default_2d_tool() -> String {
    DEFAULT_2D_TOOL.to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ccd: default_ccd_tool(),
            destripe: default_destripe_tool(),
            cte: default_cte_tool(),
            calibrate_2d: default_2d_tool(),
        }
    }
}
