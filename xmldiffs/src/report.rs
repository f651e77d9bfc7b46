use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;
use serde::{Serialize, Serializer};

/// Which stage a failed pair stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Parse,
    Io,
    ExternalTool,
}

/// Result of processing one file pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PairStatus {
    /// Report written to `report`.
    Succeeded { report: PathBuf },
    Failed { kind: FailureKind, message: String },
    /// Not started because the run was cancelled.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairOutcome {
    pub file: String,
    #[serde(flatten)]
    pub status: PairStatus,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

/// Outcomes of a batch run in pairing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<PairOutcome>,
    #[serde(rename = "total_elapsed_ms", serialize_with = "as_millis")]
    pub total_elapsed: Duration,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.count(|status| matches!(status, PairStatus::Succeeded { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, PairStatus::Failed { .. }))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|status| matches!(status, PairStatus::Cancelled))
    }

    /// Wall-clock seconds spent on each pair.
    pub fn timings(&self) -> Vec<f64> {
        self.outcomes
            .iter()
            .map(|outcome| outcome.elapsed.as_secs_f64())
            .collect()
    }

    fn count(&self, pred: impl Fn(&PairStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

/// Render one line per pair followed by the summary line.
pub fn render_text(report: &BatchReport) -> String {
    let mut out = Vec::with_capacity(report.outcomes.len() + 1);

    for outcome in &report.outcomes {
        let secs = outcome.elapsed.as_secs_f64();
        let line = match &outcome.status {
            PairStatus::Succeeded { report } => format!(
                "{} {} ({secs:.3}s) -> {}",
                "ok".green(),
                outcome.file,
                report.display()
            ),
            PairStatus::Failed { message, .. } => format!(
                "{} {} ({secs:.3}s): {message}",
                "failed".red(),
                outcome.file
            ),
            PairStatus::Cancelled => format!("{} {}", "cancelled".yellow(), outcome.file),
        };
        out.push(line);
    }

    out.push(render_summary(report));
    out.join("\n")
}

/// Render summary counts for terminal output.
pub fn render_summary(report: &BatchReport) -> String {
    format!(
        "pairs={} succeeded={} failed={} cancelled={} elapsed={:.3}s",
        report.outcomes.len(),
        report.succeeded(),
        report.failed(),
        report.cancelled(),
        report.total_elapsed.as_secs_f64()
    )
    .cyan()
    .to_string()
}
