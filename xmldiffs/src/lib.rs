//! Diff two folders of XML files while ignoring element and attribute order.
//!
//! Every file name present in both folders is canonicalized with
//! [`xml_canon_core`] into a staging folder, then handed to an external
//! renderer that turns the two canonical files into an HTML diff report.
//!
//! # Modules
//!
//! - [`pairing`]: Match file names across the two input folders
//! - [`staging`]: Where canonical copies land
//! - [`external`]: Run the HTML diff renderer and check its result
//! - [`batch`]: Drive a run over all pairs, with a worker pool and cancellation
//! - [`config`]: Run configuration from defaults, a TOML file and the CLI
//! - [`report`]: Per-pair outcomes, timings and summary rendering
//!
//! # Examples
//!
//! ```no_run
//! use xmldiffs::batch::{run, CancelFlag};
//! use xmldiffs::config::RunConfig;
//! use xmldiffs::report::render_text;
//!
//! let mut config = RunConfig::new("pre", "post");
//! config.canonical.decimals = 3;
//! let report = run(&config, &CancelFlag::new())?;
//! println!("{}", render_text(&report));
//! # Ok::<(), xmldiffs::batch::BatchError>(())
//! ```
//!
//! Files present only in the right folder are never processed.

pub mod batch;
pub mod config;
pub mod external;
pub mod pairing;
mod path_guard;
pub mod report;
pub mod staging;
