//! Output folder bookkeeping.
//!
//! Every pipeline invocation writes into one timestamp-named folder under an
//! output root, holding `success/` and `failure/` partitions.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::error::Result;

/// Name of the recognized partition.
pub const SUCCESS_DIR: &str = "success";
/// Name of the unrecognized partition.
pub const FAILURE_DIR: &str = "failure";

/// Folder name for a batch started at `now`.
pub fn timestamp_name(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Create a new, empty timestamp folder under `root`.
///
/// Two batches started within the same second get `-1`, `-2`, ... suffixes.
pub fn allocate_batch_folder(root: &Path) -> Result<PathBuf> {
    fs::create_dir_all(root)?;
    let base = timestamp_name(Local::now());

    let mut attempt = 0u32;
    loop {
        let name = match attempt {
            0 => base.clone(),
            n => format!("{}-{}", base, n),
        };
        let folder = root.join(&name);
        match fs::create_dir(&folder) {
            Ok(()) => {
                debug!("Allocated batch folder {}", folder.display());
                return Ok(folder);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Create `root/name` as a new, empty folder, or a fresh timestamp folder
/// when that name is already taken.
pub fn claim_folder(root: &Path, name: &str) -> Result<PathBuf> {
    fs::create_dir_all(root)?;
    let folder = root.join(name);
    match fs::create_dir(&folder) {
        Ok(()) => {
            debug!("Claimed folder {}", folder.display());
            Ok(folder)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            debug!("{} exists, allocating a new batch folder", folder.display());
            allocate_batch_folder(root)
        }
        Err(e) => Err(e.into()),
    }
}

/// Create the `success/` and `failure/` partitions of a batch folder.
pub fn create_subfolders(folder: &Path) -> Result<(PathBuf, PathBuf)> {
    let success = folder.join(SUCCESS_DIR);
    let failure = folder.join(FAILURE_DIR);
    fs::create_dir_all(&success)?;
    fs::create_dir_all(&failure)?;
    Ok((success, failure))
}

/// Move a file, copying across file systems when a rename is not possible.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Err(e) = fs::rename(from, to) {
        debug!(
            "rename {} -> {} failed ({}), copying instead",
            from.display(),
            to.display(),
            e
        );
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }
    Ok(())
}

/// `dir/stem.ext`, or `dir/stem_2.ext`, `dir/stem_3.ext`, ... if taken.
pub fn unique_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let candidate = dir.join(format!("{}.{}", stem, ext));
    if !candidate.exists() {
        return candidate;
    }
    (2u32..)
        .map(|n| dir.join(format!("{}_{}.{}", stem, n, ext)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Remove files, ignoring ones that are already gone.
pub fn remove_files<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) {
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => debug!("Removed {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
}

/// Names of the sub-folders of `dir`, sorted. A missing `dir` has none.
pub fn list_folders(dir: &Path) -> Result<Vec<String>> {
    list_entries(dir, |ty| ty.is_dir())
}

/// Names of the regular files in `dir`, sorted. A missing `dir` has none.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    list_entries(dir, |ty| ty.is_file())
}

fn list_entries(dir: &Path, keep: impl Fn(&fs::FileType) -> bool) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if keep(&entry.file_type()?) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
