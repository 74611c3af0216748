use std::fmt;
use std::path::Path;

use fitsio::FitsFile;
use serde::Serialize;

use crate::consts::{
    CTE_SUBARRAY_APERTURES, KEYWORD_APERTURE, KEYWORD_PCTECORR, KEYWORD_SUBARRAY, SWITCH_PERFORM,
};
use crate::error::Result;
use crate::fits::{read_logical_key, read_required_key};

/// The handful of primary-header keywords that steer a calibration run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExposureHeader {
    pub subarray: bool,
    pub aperture: String,
    pub pctecorr: String,
}

impl ExposureHeader {
    /// Read SUBARRAY, APERTURE and PCTECORR from the primary header of `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let mut fptr = FitsFile::open(path)?;
        let hdu = fptr.hdu(0)?;

        let subarray = read_logical_key(&mut fptr, &hdu, path, KEYWORD_SUBARRAY)?;
        let aperture: String = read_required_key(&mut fptr, &hdu, path, KEYWORD_APERTURE)?;
        let pctecorr: String = read_required_key(&mut fptr, &hdu, path, KEYWORD_PCTECORR)?;

        Ok(Self {
            subarray,
            aperture: aperture.trim().to_string(),
            pctecorr: pctecorr.trim().to_string(),
        })
    }

    /// Whether the exposure's own PCTECORR switch asks for CTE correction.
    /// Compared without regard to ASCII case.
    pub fn requests_cte(&self) -> bool {
        self.pctecorr.eq_ignore_ascii_case(SWITCH_PERFORM)
    }
}

/// Whether `aperture` is a subarray readout supported by pixel-based CTE
/// correction.
pub fn is_cte_subarray(aperture: &str) -> bool {
    CTE_SUBARRAY_APERTURES.contains(&aperture)
}

/// Caller-controlled switches for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanOptions {
    pub cte_correct: bool,
    pub destripe: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            cte_correct: true,
            destripe: true,
        }
    }
}

/// Outcome of the CTE-correction decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum CteDecision {
    Perform,
    /// Turned off by the caller.
    Disabled,
    /// Subarray aperture outside the supported list.
    UnsupportedSubarray(String),
    /// PCTECORR holds something other than PERFORM.
    NotRequested(String),
}

impl CteDecision {
    pub fn performs(&self) -> bool {
        matches!(self, Self::Perform)
    }
}

impl fmt::Display for CteDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Perform => write!(f, "perform"),
            Self::Disabled => write!(f, "disabled"),
            Self::UnsupportedSubarray(aperture) => {
                write!(f, "Using non-2K subarray ({aperture}), turning CTE correction off")
            }
            Self::NotRequested(value) => write!(
                f,
                "PCTECORR not set to '{SWITCH_PERFORM}' (found '{value}'), cannot run CTE correction"
            ),
        }
    }
}

/// Which external stages run for one exposure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CalibrationPlan {
    pub header: ExposureHeader,
    pub destripe: bool,
    /// Write PCTECORR=PERFORM into the intermediate header. Set for
    /// allow-listed subarrays whenever CTE correction is requested.
    pub force_pctecorr: bool,
    pub cte: CteDecision,
}

impl CalibrationPlan {
    /// Decide the run. The intermediate header update never decides whether
    /// CTE correction runs: that follows the RAW header's PCTECORR.
    pub fn resolve(header: ExposureHeader, options: PlanOptions) -> Self {
        let mut force_pctecorr = false;

        let cte = if !options.cte_correct {
            CteDecision::Disabled
        } else if header.subarray && !is_cte_subarray(&header.aperture) {
            CteDecision::UnsupportedSubarray(header.aperture.clone())
        } else {
            force_pctecorr = header.subarray;
            if header.requests_cte() {
                CteDecision::Perform
            } else {
                CteDecision::NotRequested(header.pctecorr.clone())
            }
        };

        Self {
            header,
            destripe: options.destripe,
            force_pctecorr,
            cte,
        }
    }
}
