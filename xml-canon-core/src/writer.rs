use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::canonical::{write_canonical, CanonicalOptions};
use crate::parser::{parse_file, ParseError};

/// Errors from canonicalizing one file on disk.
#[derive(Debug, Error)]
pub enum CanonError {
    /// Source file was not well-formed XML or could not be read.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    /// Destination could not be created or written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse `src` and write its canonical form to `dest`.
///
/// Parent directories of `dest` are created as needed.
pub fn canonicalize_file(
    src: &Path,
    dest: &Path,
    opts: &CanonicalOptions,
) -> Result<(), CanonError> {
    let root = parse_file(src).map_err(|source| CanonError::Parse {
        path: src.to_path_buf(),
        source,
    })?;

    let io_err = |source| CanonError::Io {
        path: dest.to_path_buf(),
        source,
    };

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut out = BufWriter::new(File::create(dest).map_err(io_err)?);
    write_canonical(&mut out, &root, opts).map_err(io_err)?;
    out.flush().map_err(io_err)?;
    Ok(())
}
