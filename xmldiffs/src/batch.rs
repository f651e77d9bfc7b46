use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};
use xml_canon_core::{canonicalize_file, CanonError, ParseError};

use crate::config::{ConfigError, RunConfig};
use crate::external::ExternalToolError;
use crate::pairing::{matching_files, FilePair};
use crate::report::{BatchReport, FailureKind, PairOutcome, PairStatus};
use crate::staging::staging_path;

/// Failure of a single file pair. Never aborts the batch.
#[derive(Debug, Error)]
pub enum PairError {
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    ExternalTool(#[from] ExternalToolError),
}

impl PairError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PairError::Parse { .. } => FailureKind::Parse,
            PairError::Io { .. } => FailureKind::Io,
            PairError::ExternalTool(_) => FailureKind::ExternalTool,
        }
    }
}

impl From<CanonError> for PairError {
    fn from(err: CanonError) -> Self {
        match err {
            CanonError::Parse { path, source } => PairError::Parse { path, source },
            CanonError::Io { path, source } => PairError::Io { path, source },
        }
    }
}

/// Errors that stop a run before any pair is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to list {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Cooperative cancellation shared between a run and its controller.
///
/// Checked before each pair starts; a pair already in progress runs to the end.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Canonicalize and render every file present in both input folders.
///
/// Pairs are processed on `config.jobs` worker threads. Outcomes come back in
/// file-name order regardless of completion order.
pub fn run(config: &RunConfig, cancel: &CancelFlag) -> Result<BatchReport, BatchError> {
    config.validate()?;
    let started = Instant::now();

    let pairs = matching_files(&config.left_dir, &config.right_dir).map_err(|source| {
        BatchError::ListDir {
            path: config.left_dir.clone(),
            source,
        }
    })?;
    info!(pairs = pairs.len(), jobs = config.jobs, "starting batch");
    let shared = shared_report_paths(&pairs, config);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()?;
    let outcomes: Vec<PairOutcome> = pool.install(|| {
        pairs
            .par_iter()
            .map(|pair| run_pair(pair, config, &shared, cancel))
            .collect()
    });

    let report = BatchReport {
        outcomes,
        total_elapsed: started.elapsed(),
    };
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        cancelled = report.cancelled(),
        "batch finished"
    );
    Ok(report)
}

/// Report paths claimed by more than one pair, such as `a.xml` and `a.txt`.
fn shared_report_paths(pairs: &[FilePair], config: &RunConfig) -> HashSet<PathBuf> {
    let mut claims: HashMap<PathBuf, usize> = HashMap::new();
    for pair in pairs {
        *claims.entry(config.report_path(pair)).or_default() += 1;
    }
    claims
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(path, _)| path)
        .collect()
}

fn run_pair(
    pair: &FilePair,
    config: &RunConfig,
    shared: &HashSet<PathBuf>,
    cancel: &CancelFlag,
) -> PairOutcome {
    let file = pair.display_name();
    if cancel.is_cancelled() {
        debug!(file = %file, "cancelled before start");
        return PairOutcome {
            file,
            status: PairStatus::Cancelled,
            elapsed: Duration::ZERO,
        };
    }

    let started = Instant::now();
    let report_path = config.report_path(pair);
    let result = if shared.contains(&report_path) {
        Err(shared_report_error(report_path))
    } else {
        process_pair(pair, config)
    };
    let status = match result {
        Ok(report) => {
            info!(
                file = %file,
                elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                report = %report.display(),
                "pair rendered"
            );
            PairStatus::Succeeded { report }
        }
        Err(err) => {
            warn!(file = %file, error = %err, "pair failed");
            PairStatus::Failed {
                kind: err.kind(),
                message: err.to_string(),
            }
        }
    };

    PairOutcome {
        file,
        status,
        elapsed: started.elapsed(),
    }
}

/// Canonicalize both sides of `pair` into staging and render the HTML report.
///
/// Returns the report path.
pub fn process_pair(pair: &FilePair, config: &RunConfig) -> Result<PathBuf, PairError> {
    fs::create_dir_all(&config.output_dir).map_err(|source| PairError::Io {
        path: config.output_dir.clone(),
        source,
    })?;

    let left_out = staging_path(&config.staging_dir, &config.left_dir, &pair.name);
    let right_out = staging_path(&config.staging_dir, &config.right_dir, &pair.name);
    canonicalize_file(&pair.left, &left_out, &config.canonical)?;
    canonicalize_file(&pair.right, &right_out, &config.canonical)?;

    let report = config.report_path(pair);
    remove_stale(&report)?;
    let run = config.diff_tool.render(&left_out, &right_out, &report)?;
    if !run.stderr.trim().is_empty() {
        warn!(
            file = %pair.display_name(),
            stderr = %run.stderr.trim(),
            "diff tool wrote to stderr"
        );
    }
    Ok(report)
}

fn shared_report_error(report: PathBuf) -> PairError {
    PairError::Io {
        path: report,
        source: io::Error::new(
            io::ErrorKind::AlreadyExists,
            "report name is shared with another input file",
        ),
    }
}

// The renderer's output check needs the report to be absent beforehand.
fn remove_stale(report: &Path) -> Result<(), PairError> {
    match fs::remove_file(report) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PairError::Io {
            path: report.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::path::PathBuf;

    use super::{shared_report_paths, CancelFlag, PairError};
    use crate::config::RunConfig;
    use crate::external::ExternalToolError;
    use crate::pairing::FilePair;
    use crate::report::FailureKind;

    #[test]
    fn cancel_flag_is_shared_between_clones() {
        let flag = CancelFlag::new();
        let handle = flag.clone();
        assert!(!flag.is_cancelled());

        handle.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn error_kinds_follow_variants() {
        let err = PairError::from(ExternalToolError::NotFound {
            program: "render".into(),
        });
        assert_eq!(err.kind(), FailureKind::ExternalTool);
        assert_eq!(err.to_string(), "diff tool render not found");
    }

    #[test]
    fn report_paths_shared_by_stem_are_detected() {
        let pair = |name: &str| FilePair {
            name: OsString::from(name),
            left: PathBuf::from("l").join(name),
            right: PathBuf::from("r").join(name),
        };
        let config = RunConfig::new("l", "r");
        let pairs = vec![pair("a.txt"), pair("a.xml"), pair("b.xml")];

        let shared = shared_report_paths(&pairs, &config);

        assert_eq!(shared.len(), 1);
        assert!(shared.contains(&PathBuf::from("out").join("a.html")));
    }
}
