use std::path::{Path, PathBuf};

use crate::consts::RAW_TOKEN;
use crate::error::{DestripeError, Result};

/// File names of every product CALACS and the destriper derive from one RAW
/// exposure. Only the file name is rewritten; the directory is kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductNames {
    pub raw: PathBuf,
    /// Bias-level-corrected intermediate written by `acsccd`.
    pub blv_tmp: PathBuf,
    /// CTE-corrected intermediate written by `acscte`.
    pub blc_tmp: PathBuf,
    pub flt: PathBuf,
    pub flc: PathBuf,
}

impl ProductNames {
    pub fn from_raw(raw: &Path) -> Result<Self> {
        let file_name = raw
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DestripeError::InvalidName(raw.to_path_buf()))?;
        let token_at = file_name
            .rfind(RAW_TOKEN)
            .ok_or_else(|| DestripeError::InvalidName(raw.to_path_buf()))?;

        let with = |replacement: &str| {
            let mut name = String::with_capacity(file_name.len() + replacement.len());
            name.push_str(&file_name[..token_at]);
            name.push_str(replacement);
            name.push_str(&file_name[token_at + RAW_TOKEN.len()..]);
            raw.with_file_name(name)
        };

        Ok(Self {
            raw: raw.to_path_buf(),
            blv_tmp: with("blv_tmp"),
            blc_tmp: with("blc_tmp"),
            flt: with("flt"),
            flc: with("flc"),
        })
    }

    /// Output of the destriping tool for the given suffix, e.g.
    /// `j_blv_tmp_strp.fits`.
    pub fn destriped(&self, suffix: &str) -> PathBuf {
        let stem = self
            .blv_tmp
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let name = match self.blv_tmp.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem}_{suffix}.{ext}"),
            None => format!("{stem}_{suffix}"),
        };
        self.blv_tmp.with_file_name(name)
    }
}
