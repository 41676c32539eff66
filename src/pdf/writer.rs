//! Output file writing.
//!
//! Files are written to a sibling temp file and renamed into place, so a
//! failed write never leaves a truncated file at the destination.

use crate::error::AppError;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write PDF bytes to `path`, replacing any existing file.
pub fn write_pdf(path: &Path, bytes: &[u8]) -> Result<u64, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Render("browser produced an empty PDF".to_string()));
    }
    replace_file(path, bytes)?;
    Ok(bytes.len() as u64)
}

/// Write the rendered HTML document to `path`, replacing any existing file.
pub fn write_html(path: &Path, html: &str) -> Result<(), AppError> {
    replace_file(path, html.as_bytes())
}

fn replace_file(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let file_error = |source: std::io::Error| AppError::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(file_error)?;
    }

    let staging = staging_path(path);
    let result = (|| {
        let mut file = fs::File::create(&staging)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&staging, path)
    })();
    if let Err(err) = result {
        let _ = fs::remove_file(&staging);
        return Err(file_error(err));
    }
    Ok(())
}

/// `dir/.name.partial-<pid>` next to the destination.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| path.as_os_str()));
    name.push(format!(".partial-{}", std::process::id()));
    path.with_file_name(name)
}
