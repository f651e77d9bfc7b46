use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Subdirectory of the staging folder that holds one input folder's output.
///
/// Only the normal components of `folder` are kept, so absolute paths and `..`
/// cannot point outside the staging folder.
pub fn staging_subdir(folder: &Path) -> PathBuf {
    folder
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

/// Location of the canonical copy of `file_name` from `folder`.
pub fn staging_path(staging_dir: &Path, folder: &Path, file_name: &OsStr) -> PathBuf {
    staging_dir.join(staging_subdir(folder)).join(file_name)
}
