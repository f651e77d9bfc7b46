use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// A file name present in both input folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    /// File name shared by both sides.
    pub name: OsString,
    /// Path inside the left folder.
    pub left: PathBuf,
    /// Path inside the right folder.
    pub right: PathBuf,
}

impl FilePair {
    /// File name for display and reports.
    pub fn display_name(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }

    /// File name without its final extension, used to name the HTML report.
    pub fn report_stem(&self) -> OsString {
        Path::new(&self.name)
            .file_stem()
            .map(OsString::from)
            .unwrap_or_else(|| self.name.clone())
    }
}

/// List regular files directly inside `left_dir` that also exist in `right_dir`.
///
/// Only the left folder is enumerated: files that exist only on the right are
/// never paired. Symlinks are followed. Results are sorted by file name.
pub fn matching_files(left_dir: &Path, right_dir: &Path) -> io::Result<Vec<FilePair>> {
    let mut pairs = Vec::new();

    for entry in fs::read_dir(left_dir)? {
        let entry = entry?;
        let left = entry.path();
        if !left.is_file() {
            continue;
        }

        let name = entry.file_name();
        let right = right_dir.join(&name);
        if !right.is_file() {
            debug!(file = %name.to_string_lossy(), "no counterpart in right folder, skipping");
            continue;
        }

        pairs.push(FilePair { name, left, right });
    }

    pairs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::fs;

    use super::{matching_files, FilePair};

    #[test]
    fn pairs_only_names_present_on_both_sides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let left = dir.path().join("left");
        let right = dir.path().join("right");
        fs::create_dir_all(left.join("nested")).expect("left dirs");
        fs::create_dir_all(right.join("nested")).expect("right dirs");

        for name in ["b.xml", "a.xml", "left_only.xml"] {
            fs::write(left.join(name), "<a/>").expect("left write");
        }
        for name in ["a.xml", "b.xml", "right_only.xml"] {
            fs::write(right.join(name), "<a/>").expect("right write");
        }

        let pairs = matching_files(&left, &right).expect("listing");
        let names: Vec<_> = pairs.iter().map(FilePair::display_name).collect();
        assert_eq!(names, vec!["a.xml", "b.xml"]);
        assert_eq!(pairs[0].right, right.join("a.xml"));
    }

    #[test]
    fn report_stem_drops_only_the_last_extension() {
        let pair = |name: &str| FilePair {
            name: OsString::from(name),
            left: name.into(),
            right: name.into(),
        };

        assert_eq!(pair("config.xml").report_stem(), "config");
        assert_eq!(pair("archive.tar.xml").report_stem(), "archive.tar");
        assert_eq!(pair("README").report_stem(), "README");
    }

    #[test]
    fn missing_left_folder_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matching_files(&dir.path().join("nope"), dir.path()).is_err());
    }
}
