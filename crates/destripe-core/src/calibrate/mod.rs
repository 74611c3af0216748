mod external;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pipeline::config::DestripeConfig;

pub use external::ExternalBackend;

/// Optional bad-pixel masks for the two WFC amplifier chips, used to keep
/// sources out of the stripe estimate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripeMasks {
    /// Mask for the SCI,1 extension.
    #[serde(default)]
    pub sci1: Option<PathBuf>,
    /// Mask for the SCI,2 extension.
    #[serde(default)]
    pub sci2: Option<PathBuf>,
}

impl StripeMasks {
    pub fn is_empty(&self) -> bool {
        self.sci1.is_none() && self.sci2.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.sci1.iter().chain(self.sci2.iter())
    }
}

/// The external calibration stages, in the order a run invokes them.
///
/// Each call reads and writes files next to its input; naming follows the
/// CALACS conventions captured by [`crate::naming::ProductNames`].
pub trait CalibrationBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Bias, overscan and blev correction: `*_raw` -> `*_blv_tmp`.
    fn ccd(&self, raw: &Path) -> Result<()>;

    /// Stripe removal: `*_blv_tmp` -> `*_blv_tmp_<suffix>`.
    fn destripe(&self, input: &Path, config: &DestripeConfig, masks: &StripeMasks) -> Result<()>;

    /// Pixel-based CTE correction: `*_blv_tmp` -> `*_blc_tmp`.
    fn cte(&self, blv: &Path) -> Result<()>;

    /// Dark, flat and final calibration: `*_blv_tmp` -> `*_flt`,
    /// `*_blc_tmp` -> `*_flc`.
    fn calibrate_2d(&self, input: &Path) -> Result<()>;
}
