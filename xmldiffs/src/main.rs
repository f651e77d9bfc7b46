use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xmldiffs::batch::{run, CancelFlag};
use xmldiffs::config::{load_config_file, RunConfig, DEFAULT_CONFIG_FILE};
use xmldiffs::report::render_text;

mod cli;

use cli::{Cli, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    let report = run(&config, &CancelFlag::new()).context("batch run failed")?;

    match cli.format {
        OutputFormat::Text => println!("{}", render_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if cli.strict && report.failed() > 0 {
        bail!(
            "strict mode failed: {} of {} file pairs failed",
            report.failed(),
            report.outcomes.len()
        );
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("xmldiffs={level},xml_canon_core={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Defaults, then the config file, then command-line flags.
fn build_config(cli: &Cli) -> Result<RunConfig> {
    let mut config = RunConfig::new(&cli.folder1, &cli.folder2);

    let config_path = match &cli.config {
        Some(path) => Some(path.as_path()),
        None => Some(Path::new(DEFAULT_CONFIG_FILE)).filter(|path| path.is_file()),
    };
    if let Some(path) = config_path {
        let file = load_config_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        config.apply_file(file);
    }

    if let Some(dir) = &cli.diff_dir {
        config.output_dir = dir.clone();
    }
    if let Some(dir) = &cli.xml_dir {
        config.staging_dir = dir.clone();
    }
    if let Some(decimals) = cli.round {
        config.canonical.decimals = decimals;
    }
    if let Some(program) = &cli.diff_tool {
        config.diff_tool.program = program.clone();
    }
    if !cli.diff_tool_args.is_empty() {
        config.diff_tool.args = cli.diff_tool_args.clone();
    }
    if let Some(jobs) = cli.jobs {
        config.jobs = jobs;
    }

    Ok(config)
}
