use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

use bnnkit_io_xlsx::C_SHEET_NAME_DEFAULT;

use crate::run::SpecRunOptions;

#[derive(Parser, Debug, Clone)]
#[command(name = "bnnkit")]
#[command(about = "Pivot BD BNN order lines into one row per PO, color and size group")]
#[command(version)]
pub struct CliArgs {
    /// BD BNN workbook (.xlsx/.xls); the first sheet is read
    #[arg(value_name = "BD_BNN")]
    pub path_bd_bnn: PathBuf,

    /// BD COFACO workbook (accepted for compatibility, not read)
    #[arg(long = "cofaco", value_name = "PATH")]
    pub path_cofaco: Option<PathBuf>,

    /// Output workbook path
    /// Default: <folder of BD_BNN>/BNN_procesado_<YYYYMMDD>.xlsx
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub path_output: Option<PathBuf>,

    /// Name of the output sheet
    #[arg(long, default_value = C_SHEET_NAME_DEFAULT)]
    pub sheet_name: String,

    /// TOML file overriding the size taxonomy and column layout
    #[arg(long = "config", short = 'c', value_name = "TOML")]
    pub path_config: Option<PathBuf>,

    /// Fail when rows merged into one output row disagree on an attribute
    #[arg(long)]
    pub strict_attributes: bool,

    /// Do not open the result in the default viewer
    #[arg(long)]
    pub no_open: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    /// Log filter used when `RUST_LOG` is unset.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn to_run_options(&self) -> SpecRunOptions {
        SpecRunOptions {
            path_bd_bnn: self.path_bd_bnn.clone(),
            path_cofaco: self.path_cofaco.clone(),
            path_output: self.path_output.clone(),
            sheet_name: self.sheet_name.clone(),
            path_config: self.path_config.clone(),
            if_strict_attributes: self.strict_attributes,
            if_open_result: !self.no_open,
        }
    }
}
