use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "xmldiffs")]
#[command(about = "Compare two folders of XML files ignoring element and attribute order")]
pub struct Cli {
    /// Location of the pre snap XML files.
    pub folder1: PathBuf,
    /// Location of the post snap XML files.
    pub folder2: PathBuf,
    /// Location to place diffs [default: out].
    #[arg(short = 'd', long = "diff-dir", value_name = "DIFF_FOLDER")]
    pub diff_dir: Option<PathBuf>,
    /// Location to place ordered XMLs [default: cleaned].
    #[arg(short = 'x', long = "xml-dir", value_name = "XML_FOLDER")]
    pub xml_dir: Option<PathBuf>,
    /// Decimal places to round numbers to [default: 2].
    #[arg(short = 'r', long = "round", value_name = "INT")]
    pub round: Option<usize>,
    /// Program that renders two canonical files into an HTML report [default: ./diff_to_html.sh].
    #[arg(long, value_name = "PROGRAM")]
    pub diff_tool: Option<PathBuf>,
    /// Extra leading argument for the diff tool (repeatable).
    #[arg(long = "diff-tool-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub diff_tool_args: Vec<String>,
    /// Number of file pairs processed in parallel [default: 1].
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
    /// TOML config file. Defaults to ./xmldiffs.toml if present.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Exit with an error if any file pair failed.
    #[arg(long)]
    pub strict: bool,
    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
