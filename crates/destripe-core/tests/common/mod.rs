#![allow(dead_code)]

use std::ffi::CString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use destripe_core::calibrate::{CalibrationBackend, StripeMasks};
use destripe_core::error::{DestripeError, Result};
use destripe_core::naming::ProductNames;
use destripe_core::pipeline::config::DestripeConfig;
use fitsio::FitsFile;

/// Create a FITS file with an empty primary HDU carrying `SUBARRAY` (when
/// given) and the string keywords in `keys`.
pub fn write_fits(path: &Path, subarray: Option<bool>, keys: &[(&str, &str)]) {
    let mut fptr = FitsFile::create(path).open().unwrap();
    let hdu = fptr.hdu(0).unwrap();
    if let Some(subarray) = subarray {
        let keyword = CString::new("SUBARRAY").unwrap();
        let comment = CString::new("data from a subarray (T) or full frame (F)").unwrap();
        let mut status = 0;
        unsafe {
            fitsio_sys::ffpkyl(
                fptr.as_raw(),
                keyword.as_ptr(),
                subarray as i32,
                comment.as_ptr(),
                &mut status,
            );
        }
        fitsio::errors::check_status(status).unwrap();
    }
    for (keyword, value) in keys {
        hdu.write_key(&mut fptr, keyword, *value).unwrap();
    }
}

/// Write an ACS/WFC-like RAW exposure into `dir`.
pub fn write_raw(dir: &Path, name: &str, subarray: bool, aperture: &str, pctecorr: &str) -> PathBuf {
    let path = dir.join(name);
    write_fits(
        &path,
        Some(subarray),
        &[("APERTURE", aperture), ("PCTECORR", pctecorr)],
    );
    path
}

/// Backend that records each stage and produces the files the real tools
/// would, by copying its input.
#[derive(Default)]
pub struct MockBackend {
    pub calls: Mutex<Vec<String>>,
    pub fail_on: Option<&'static str>,
    /// Stage that "succeeds" without writing its product.
    pub skip_output_on: Option<&'static str>,
    /// acs2d consumes `*_blv_tmp.fits` after writing the FLT, as some
    /// CALACS builds do.
    pub consume_blv_on_2d: bool,
}

impl MockBackend {
    pub fn failing_on(stage: &'static str) -> Self {
        Self {
            fail_on: Some(stage),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, stage: &str, input: &Path) -> Result<bool> {
        let name = input.file_name().unwrap().to_string_lossy();
        self.calls.lock().unwrap().push(format!("{stage} {name}"));
        if self.fail_on == Some(stage) {
            return Err(DestripeError::Pipeline(format!("mock {stage} failure")));
        }
        Ok(self.skip_output_on != Some(stage))
    }

    fn raw_of(input: &Path, token: &str) -> PathBuf {
        let name = input.file_name().unwrap().to_str().unwrap().replacen(token, "raw", 1);
        input.with_file_name(name)
    }
}

impl CalibrationBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn ccd(&self, raw: &Path) -> Result<()> {
        if self.record("ccd", raw)? {
            let names = ProductNames::from_raw(raw)?;
            fs::copy(raw, names.blv_tmp)?;
        }
        Ok(())
    }

    fn destripe(&self, input: &Path, config: &DestripeConfig, _masks: &StripeMasks) -> Result<()> {
        if self.record("destripe", input)? {
            let names = ProductNames::from_raw(&Self::raw_of(input, "blv_tmp"))?;
            fs::copy(input, names.destriped(&config.suffix))?;
        }
        Ok(())
    }

    fn cte(&self, blv: &Path) -> Result<()> {
        if self.record("cte", blv)? {
            let names = ProductNames::from_raw(&Self::raw_of(blv, "blv_tmp"))?;
            fs::copy(blv, names.blc_tmp)?;
        }
        Ok(())
    }

    fn calibrate_2d(&self, input: &Path) -> Result<()> {
        if self.record("2d", input)? {
            let file_name = input.file_name().unwrap().to_str().unwrap();
            let output = if file_name.contains("blc_tmp") {
                ProductNames::from_raw(&Self::raw_of(input, "blc_tmp"))?.flc
            } else {
                ProductNames::from_raw(&Self::raw_of(input, "blv_tmp"))?.flt
            };
            fs::copy(input, output)?;
            if self.consume_blv_on_2d && file_name.contains("blv_tmp") {
                fs::remove_file(input)?;
            }
        }
        Ok(())
    }
}
