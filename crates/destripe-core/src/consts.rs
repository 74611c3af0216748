/// Subarray apertures for which pixel-based CTE correction is supported.
pub const CTE_SUBARRAY_APERTURES: [&str; 16] = [
    "WFC1-2K",
    "WFC1-POL0UV",
    "WFC1-POL0V",
    "WFC1-POL60V",
    "WFC1-POL60UV",
    "WFC1-POL120V",
    "WFC1-POL120UV",
    "WFC1-SMFL",
    "WFC1-IRAMPQ",
    "WFC1-MRAMPQ",
    "WFC2-2K",
    "WFC2-ORAMPQ",
    "WFC2-SMFL",
    "WFC2-POL0UV",
    "WFC2-POL0V",
    "WFC2-MRAMPQ",
];

/// Calibration switch value that enables a CALACS step.
pub const SWITCH_PERFORM: &str = "PERFORM";

/// Primary header keywords consulted when planning the run.
pub const KEYWORD_SUBARRAY: &str = "SUBARRAY";
pub const KEYWORD_APERTURE: &str = "APERTURE";
pub const KEYWORD_PCTECORR: &str = "PCTECORR";

/// Token in RAW file names that CALACS replaces to name its products.
pub const RAW_TOKEN: &str = "raw";

/// Suffix appended by the destriping tool to its output.
pub const DEFAULT_DESTRIPE_SUFFIX: &str = "strp";

/// Maximum sigma-clipping iterations for stripe estimation.
pub const DEFAULT_DESTRIPE_MAXITER: u32 = 15;

/// Sigma rejection threshold for stripe estimation.
pub const DEFAULT_DESTRIPE_SIGREJ: f64 = 2.0;

/// Default executables of the external calibration package.
pub const DEFAULT_CCD_TOOL: &str = "acsccd";
pub const DEFAULT_DESTRIPE_TOOL: &str = "acs_destripe";
pub const DEFAULT_CTE_TOOL: &str = "acscte";
pub const DEFAULT_2D_TOOL: &str = "acs2d";

/// File name ending that marks a RAW exposure during batch discovery.
pub const RAW_FILE_ENDING: &str = "raw.fits";
