use std::io;
use std::path::{Path, PathBuf};

/// Whether `a` and `b` refer to the same location.
pub fn same_location(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(normalize_for_compare(a)? == normalize_for_compare(b)?)
}

fn normalize_for_compare(path: &Path) -> io::Result<PathBuf> {
    if path.exists() {
        // canonicalize resolves symlinks and `..` for paths that exist on disk.
        return path.canonicalize();
    }

    // Paths that don't exist yet (output folders) can't be canonicalized.
    // `..` is not resolved here, so this is best-effort.
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir()?
    };

    Ok(base.join(path))
}
