use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use xml_canon_core::CanonicalOptions;

use crate::external::DiffTool;
use crate::pairing::FilePair;
use crate::path_guard::same_location;
use crate::staging::staging_subdir;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "xmldiffs.toml";
/// Default folder for HTML reports.
pub const DEFAULT_DIFF_DIR: &str = "out";
/// Default folder for canonical XML copies.
pub const DEFAULT_XML_DIR: &str = "cleaned";

/// Errors returned when loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Optional settings read from a TOML file. Every key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub diff_dir: Option<PathBuf>,
    pub xml_dir: Option<PathBuf>,
    pub diff_tool: Option<PathBuf>,
    pub diff_tool_args: Option<Vec<String>>,
    pub jobs: Option<usize>,
    pub canonical: Option<CanonicalOptions>,
}

/// Load a [`ConfigFile`] from disk.
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_config(&raw, path.display().to_string())
}

fn parse_config(raw: &str, path: String) -> Result<ConfigFile, ConfigError> {
    toml::from_str(raw).map_err(|source| ConfigError::Parse { path, source })
}

/// Everything one batch run needs. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub left_dir: PathBuf,
    pub right_dir: PathBuf,
    /// Where HTML reports are written.
    pub output_dir: PathBuf,
    /// Where canonical copies are staged.
    pub staging_dir: PathBuf,
    pub canonical: CanonicalOptions,
    pub diff_tool: DiffTool,
    /// Worker threads; 1 processes pairs sequentially.
    pub jobs: usize,
}

impl RunConfig {
    /// Defaults for comparing `left_dir` against `right_dir`.
    pub fn new(left_dir: impl Into<PathBuf>, right_dir: impl Into<PathBuf>) -> Self {
        Self {
            left_dir: left_dir.into(),
            right_dir: right_dir.into(),
            output_dir: PathBuf::from(DEFAULT_DIFF_DIR),
            staging_dir: PathBuf::from(DEFAULT_XML_DIR),
            canonical: CanonicalOptions::default(),
            diff_tool: DiffTool::default(),
            jobs: 1,
        }
    }

    /// Overlay the keys present in `file`.
    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(dir) = file.diff_dir {
            self.output_dir = dir;
        }
        if let Some(dir) = file.xml_dir {
            self.staging_dir = dir;
        }
        if let Some(program) = file.diff_tool {
            self.diff_tool.program = program;
        }
        if let Some(args) = file.diff_tool_args {
            self.diff_tool.args = args;
        }
        if let Some(jobs) = file.jobs {
            self.jobs = jobs;
        }
        if let Some(canonical) = file.canonical {
            self.canonical = canonical;
        }
    }

    /// Path of the HTML report for `pair`.
    pub fn report_path(&self, pair: &FilePair) -> PathBuf {
        let mut name = pair.report_stem();
        name.push(".html");
        self.output_dir.join(name)
    }

    /// Staging folder for one side's canonical copies.
    pub fn staging_folder(&self, input_dir: &Path) -> PathBuf {
        self.staging_dir.join(staging_subdir(input_dir))
    }

    /// Reject configurations that would overwrite inputs or mix up the two sides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs == 0 {
            return Err(ConfigError::Invalid("jobs must be at least 1".to_string()));
        }

        for dir in [&self.left_dir, &self.right_dir] {
            if !dir.is_dir() {
                return Err(ConfigError::Invalid(format!(
                    "input folder {} does not exist or is not a directory",
                    dir.display()
                )));
            }
        }

        let left_staging = self.staging_folder(&self.left_dir);
        let right_staging = self.staging_folder(&self.right_dir);
        if left_staging == right_staging {
            return Err(ConfigError::Invalid(format!(
                "{} and {} would share staging folder {}",
                self.left_dir.display(),
                self.right_dir.display(),
                left_staging.display()
            )));
        }

        let outputs = [
            ("diff folder", &self.output_dir),
            ("staging folder", &left_staging),
            ("staging folder", &right_staging),
        ];
        for (label, output) in outputs {
            for input in [&self.left_dir, &self.right_dir] {
                if self.overlaps(output, input)? {
                    return Err(ConfigError::Invalid(format!(
                        "refusing to write into input folder: {label} {} matches {}",
                        output.display(),
                        input.display()
                    )));
                }
            }
        }

        Ok(())
    }

    fn overlaps(&self, output: &Path, input: &Path) -> Result<bool, ConfigError> {
        same_location(output, input).map_err(|source| ConfigError::Io {
            path: output.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use xml_canon_core::CanonicalOptions;

    use super::{parse_config, ConfigError, ConfigFile, RunConfig};

    #[test]
    fn parses_every_key() {
        let parsed = parse_config(
            r#"
diff_dir = "reports"
xml_dir = "staged"
diff_tool = "/usr/local/bin/render"
diff_tool_args = ["--theme", "dark"]
jobs = 4

[canonical]
decimals = 3
"#,
            "test".to_string(),
        )
        .expect("config should parse");

        assert_eq!(parsed.diff_dir, Some(PathBuf::from("reports")));
        assert_eq!(parsed.jobs, Some(4));
        assert_eq!(parsed.canonical, Some(CanonicalOptions::with_decimals(3)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_config("decimals = 3\n", "test".to_string()).expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn file_values_override_defaults_only_where_present() {
        let mut config = RunConfig::new("a", "b");
        config.apply_file(ConfigFile {
            xml_dir: Some(PathBuf::from("staged")),
            diff_tool_args: Some(vec!["x".to_string()]),
            ..ConfigFile::default()
        });

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.staging_dir, PathBuf::from("staged"));
        assert_eq!(config.diff_tool.args, vec!["x".to_string()]);
        assert_eq!(config.canonical.decimals, 2);
    }

    #[test]
    fn validate_rejects_zero_jobs_and_missing_inputs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let left = dir.path().join("left");
        let right = dir.path().join("right");
        fs::create_dir_all(&left).expect("left");

        let mut config = RunConfig::new(&left, &right);
        assert!(config.validate().is_err());

        fs::create_dir_all(&right).expect("right");
        config.output_dir = dir.path().join("out");
        config.staging_dir = dir.path().join("cleaned");
        config.validate().expect("valid config");

        config.jobs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_output_inside_an_input_folder() {
        let dir = tempfile::tempdir().expect("tempdir");
        let left = dir.path().join("left");
        let right = dir.path().join("right");
        fs::create_dir_all(&left).expect("left");
        fs::create_dir_all(&right).expect("right");

        let mut config = RunConfig::new(&left, &right);
        config.staging_dir = dir.path().join("cleaned");
        config.output_dir = right.clone();

        let err = config.validate().expect_err("should refuse");
        assert!(err.to_string().contains("refusing to write into input folder"));
    }
}
