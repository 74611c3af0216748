//! Primary-header access through cfitsio.

use std::ffi::CString;
use std::path::Path;
use std::ptr;

use fitsio::errors::{check_status, Error as FitsioError};
use fitsio::hdu::FitsHdu;
use fitsio::headers::ReadsKey;
use fitsio::FitsFile;
use tracing::debug;

use crate::error::{DestripeError, Result};

/// cfitsio status for a keyword that is not in the header.
const KEY_NO_EXIST: i32 = 202;

fn is_missing_key(err: &FitsioError) -> bool {
    matches!(err, FitsioError::Fits(e) if e.status == KEY_NO_EXIST)
}

/// Read `keyword` from `hdu`. An absent keyword is reported as
/// [`DestripeError::MissingKeyword`] naming `path`.
pub fn read_required_key<T: ReadsKey>(
    fptr: &mut FitsFile,
    hdu: &FitsHdu,
    path: &Path,
    keyword: &str,
) -> Result<T> {
    hdu.read_key::<T>(fptr, keyword).map_err(|e| {
        if is_missing_key(&e) {
            DestripeError::MissingKeyword {
                path: path.to_path_buf(),
                keyword: keyword.to_string(),
            }
        } else {
            e.into()
        }
    })
}

/// Read a logical (`T`/`F`) keyword. cfitsio hands logicals to integer
/// readers as 1/0.
pub fn read_logical_key(
    fptr: &mut FitsFile,
    hdu: &FitsHdu,
    path: &Path,
    keyword: &str,
) -> Result<bool> {
    match read_required_key::<i64>(fptr, hdu, path, keyword)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(DestripeError::InvalidKeyword {
            keyword: keyword.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Read a string keyword from the primary header of `path`.
pub fn read_primary_str(path: &Path, keyword: &str) -> Result<String> {
    let mut fptr = FitsFile::open(path)?;
    let hdu = fptr.hdu(0)?;
    let value: String = read_required_key(&mut fptr, &hdu, path, keyword)?;
    Ok(value.trim().to_string())
}

/// Set a string keyword in the primary header of `path`. An existing card is
/// rewritten in place and keeps its comment; otherwise a new card is added.
pub fn update_primary_str(path: &Path, keyword: &str, value: &str) -> Result<()> {
    let mut fptr = FitsFile::edit(path)?;
    let hdu = fptr.hdu(0)?;

    match hdu.read_key::<String>(&mut fptr, keyword) {
        Err(e) if is_missing_key(&e) => {
            hdu.write_key(&mut fptr, keyword, value)?;
            debug!(path = %path.display(), keyword, value, "Added keyword");
        }
        Err(e) => return Err(e.into()),
        Ok(previous) => {
            // write_key always appends, which would leave the old card first
            // in the header.
            let invalid = || DestripeError::InvalidKeyword {
                keyword: keyword.to_string(),
                value: value.to_string(),
            };
            let c_keyword = CString::new(keyword).map_err(|_| invalid())?;
            let c_value = CString::new(value).map_err(|_| invalid())?;
            let mut status = 0;
            unsafe {
                fitsio_sys::ffukys(
                    fptr.as_raw(),
                    c_keyword.as_ptr(),
                    c_value.as_ptr(),
                    ptr::null(),
                    &mut status,
                );
            }
            check_status(status)?;
            debug!(
                path = %path.display(),
                keyword,
                from = previous.trim(),
                to = value,
                "Updated keyword"
            );
        }
    }
    Ok(())
}
