use std::ffi::OsString;
use std::fs;
use std::path::{is_separator, Path};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::error::{DestripeError, Result};
use crate::pipeline::config::{DestripeConfig, ToolsConfig};

use super::{CalibrationBackend, StripeMasks};

/// Runs the calibration package's command-line tools as child processes.
pub struct ExternalBackend {
    tools: ToolsConfig,
}

impl ExternalBackend {
    pub fn new(tools: ToolsConfig) -> Self {
        Self { tools }
    }

    /// Run `tool` with `args` from the directory holding `input`, passing
    /// `input` by file name so products land beside it.
    fn run(&self, stage: &str, tool: &str, input: &Path, extra: Vec<OsString>) -> Result<()> {
        let dir = match input.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file_name = input.file_name().unwrap_or(input.as_os_str());

        // A tool may be a full command line, e.g. `python -m acstools.acs_destripe`.
        let mut words = tool.split_whitespace();
        let program = words.next().ok_or_else(|| DestripeError::ToolUnavailable {
            tool: tool.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        })?;

        // The child starts in `dir`, so a relative tool path is resolved here.
        let program = if program.contains(is_separator) {
            fs::canonicalize(program)
                .map_err(|source| DestripeError::ToolUnavailable {
                    tool: tool.to_string(),
                    source,
                })?
                .into_os_string()
        } else {
            OsString::from(program)
        };

        let mut cmd = Command::new(&program);
        cmd.args(words).arg(file_name).args(&extra).current_dir(dir);
        info!(stage, tool, input = %input.display(), "Running external stage");
        debug!(command = ?cmd, "Spawning");

        let output = cmd.output().map_err(|source| DestripeError::ToolUnavailable {
            tool: tool.to_string(),
            source,
        })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(tool, "{line}");
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            warn!(tool, "{line}");
        }

        if !output.status.success() {
            return Err(DestripeError::StageFailed {
                stage: stage.to_string(),
                status: output.status,
            });
        }
        Ok(())
    }
}

impl CalibrationBackend for ExternalBackend {
    fn name(&self) -> &str {
        "external"
    }

    fn ccd(&self, raw: &Path) -> Result<()> {
        self.run("acsccd", &self.tools.ccd, raw, Vec::new())
    }

    fn destripe(&self, input: &Path, config: &DestripeConfig, masks: &StripeMasks) -> Result<()> {
        let mut args: Vec<OsString> = vec![
            config.suffix.clone().into(),
            "--maxiter".into(),
            config.maxiter.to_string().into(),
            "--sigrej".into(),
            config.sigrej.to_string().into(),
        ];
        // The tool runs from the exposure's directory, so masks go in absolute.
        if let Some(ref mask) = masks.sci1 {
            args.push("--mask1".into());
            args.push(fs::canonicalize(mask)?.into_os_string());
        }
        if let Some(ref mask) = masks.sci2 {
            args.push("--mask2".into());
            args.push(fs::canonicalize(mask)?.into_os_string());
        }
        if config.clobber {
            args.push("--clobber".into());
        }
        self.run("acs_destripe", &self.tools.destripe, input, args)
    }

    fn cte(&self, blv: &Path) -> Result<()> {
        self.run("acscte", &self.tools.cte, blv, Vec::new())
    }

    fn calibrate_2d(&self, input: &Path) -> Result<()> {
        self.run("acs2d", &self.tools.calibrate_2d, input, Vec::new())
    }
}
