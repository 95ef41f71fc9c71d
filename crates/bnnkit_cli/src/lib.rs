//! `bnnkit_cli` v1:
//! Command-line front end for the BD BNN size-group pivot.
//!
//! Modules:
//! - `cli`    : argument parsing
//! - `config` : TOML overrides for pivot options
//! - `run`    : read, pivot, write and open pipeline
//! - `viewer` : OS default-application launcher
pub mod cli;
pub mod config;
pub mod run;
pub mod viewer;

pub use cli::CliArgs;
pub use config::{ConfigError, load_pivot_options};
pub use run::{EnumRunOutcome, SpecRunOptions, derive_default_output_path, run};
pub use viewer::{ViewerError, open_in_default_viewer};
