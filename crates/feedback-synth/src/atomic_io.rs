//! Atomic output file writes.
//!
//! Each output file is written to a hidden sibling, synced, and renamed over
//! the destination, so readers never observe a half-written corpus.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

use crate::error::ExportError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes `contents` to `file_name` inside `dir` via a temp file and rename.
///
/// `target` is the full destination path, used only for error reporting.
///
/// # Errors
///
/// Returns [`ExportError::WriteError`] if `file_name` is not a single path
/// component or the file cannot be written.
pub(crate) fn write_atomic(
    dir: &Dir,
    file_name: &Utf8Path,
    target: &Utf8Path,
    contents: &[u8],
) -> Result<(), ExportError> {
    let mut components = file_name.components();
    let (Some(Utf8Component::Normal(name)), None) = (components.next(), components.next())
    else {
        return Err(ExportError::WriteError {
            path: target.to_path_buf(),
            message: "output path must name a file".to_owned(),
        });
    };
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(".{name}.tmp.{}.{suffix}.{counter}", std::process::id());

    write_temp_file(dir, &tmp_name, target, contents)?;
    if let Err(err) = rename_into_place(dir, &tmp_name, name) {
        drop(dir.remove_file(&tmp_name));
        return Err(ExportError::WriteError {
            path: target.to_path_buf(),
            message: err.to_string(),
        });
    }
    sync_directory(dir);

    Ok(())
}

fn write_temp_file(
    dir: &Dir,
    tmp_name: &str,
    target: &Utf8Path,
    contents: &[u8],
) -> Result<(), ExportError> {
    let tmp_path = target.with_file_name(tmp_name);
    let write_error = |err: io::Error| ExportError::WriteError {
        path: tmp_path.clone(),
        message: err.to_string(),
    };

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options).map_err(write_error)?;

    if let Err(err) = file.write_all(contents).and_then(|()| file.sync_all()) {
        drop(file);
        drop(dir.remove_file(tmp_name));
        return Err(write_error(err));
    }

    Ok(())
}

#[cfg(windows)]
fn rename_into_place(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_into_place(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_directory(dir: &Dir) {
    // Best effort; some platforms cannot sync directories.
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        tracing::debug!("directory sync skipped");
    }
}
