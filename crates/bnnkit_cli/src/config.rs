//! Optional TOML overrides for the pivot layout.
//!
//! Every field of [`SpecPivotOptions`] may be set; absent fields keep their
//! compiled-in defaults.
//!
//! ```toml
//! col_total = "TT"
//!
//! [[size_groups]]
//! name = "Grp A"
//! sizes = ["XS", "S", "M", "L", "XL"]
//! ```
use std::fs;
use std::path::{Path, PathBuf};

use bnnkit_pivot::{PivotError, SpecPivotOptions};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: PivotError,
    },
}

/// Parse pivot options from TOML text.
pub fn parse_pivot_options(text: &str) -> Result<SpecPivotOptions, toml::de::Error> {
    toml::from_str(text)
}

/// Load pivot options, falling back to defaults when no file is given.
///
/// Loaded options are validated before they are returned.
pub fn load_pivot_options(path: Option<&Path>) -> Result<SpecPivotOptions, ConfigError> {
    let Some(path) = path else {
        debug!("No config file given; using default pivot options");
        return Ok(SpecPivotOptions::default());
    };

    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let options = parse_pivot_options(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    options.validate().map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Loaded pivot options from {}: {} size group(s)",
        path.display(),
        options.size_groups.len()
    );
    Ok(options)
}
