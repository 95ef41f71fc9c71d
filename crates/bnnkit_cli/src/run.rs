//! End-to-end pipeline: read BD BNN, pivot, write, open.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bnnkit_io_xlsx::{
    EnumAutofitColumnsRule, SpecAutofitCellsPolicy, SpecSheetWriteOptions, XlsxWriter,
    read_first_sheet,
};
use bnnkit_pivot::{ReportPivot, pivot_table_with_report};
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};

use crate::config::load_pivot_options;
use crate::viewer::open_in_default_viewer;

/// Resolved inputs of one run.
#[derive(Debug, Clone)]
pub struct SpecRunOptions {
    pub path_bd_bnn: PathBuf,
    pub path_cofaco: Option<PathBuf>,
    /// `None` writes next to BD BNN as `BNN_procesado_<YYYYMMDD>.xlsx`.
    pub path_output: Option<PathBuf>,
    pub sheet_name: String,
    pub path_config: Option<PathBuf>,
    pub if_strict_attributes: bool,
    pub if_open_result: bool,
}

#[derive(Debug, Clone)]
pub enum EnumRunOutcome {
    /// Result saved to `path_output`.
    Written {
        path_output: PathBuf,
        report: ReportPivot,
    },
    /// The pivot produced no rows; no file was written.
    NothingToProcess { report: ReportPivot },
}

/// `<folder of BD BNN>/BNN_procesado_<YYYYMMDD>.xlsx`
pub fn derive_default_output_path(path_bd_bnn: &Path, date: NaiveDate) -> PathBuf {
    let path_dir = path_bd_bnn.parent().unwrap_or_else(|| Path::new(""));
    path_dir.join(format!("BNN_procesado_{}.xlsx", date.format("%Y%m%d")))
}

/// Freeze the header and leading attribute columns; fit widths to the values.
pub fn derive_sheet_write_options(n_cols_fixed: usize) -> SpecSheetWriteOptions {
    SpecSheetWriteOptions {
        col_freeze: n_cols_fixed,
        policy_autofit: SpecAutofitCellsPolicy {
            rule_columns: EnumAutofitColumnsRule::All,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn run(options: &SpecRunOptions) -> Result<EnumRunOutcome> {
    info!("Starting processing...");
    if let Some(path_cofaco) = &options.path_cofaco {
        info!("BD COFACO selected: {} (not used)", path_cofaco.display());
    }

    let mut pivot_options = load_pivot_options(options.path_config.as_deref())
        .context("Failed to load pivot options")?;
    if options.if_strict_attributes {
        pivot_options.if_check_consistent_attributes = true;
    }

    info!("Loading BD BNN...");
    let df_bnn = read_first_sheet(&options.path_bd_bnn)
        .with_context(|| format!("Failed to read BD BNN {}", options.path_bd_bnn.display()))?;
    info!(
        "BD BNN loaded: {} rows, {} columns",
        df_bnn.height(),
        df_bnn.width()
    );

    info!("Grouping data by PO # and Color Code...");
    let result = pivot_table_with_report(&df_bnn, &pivot_options)
        .with_context(|| format!("Failed to process {}", options.path_bd_bnn.display()))?;
    debug!("{}", result.report);
    for c_warning in &result.report.warnings {
        warn!("{c_warning}");
    }

    if result.is_empty() {
        info!("Nothing to process: no output file written.");
        return Ok(EnumRunOutcome::NothingToProcess {
            report: result.report,
        });
    }

    let path_output = options.path_output.clone().unwrap_or_else(|| {
        derive_default_output_path(&options.path_bd_bnn, Local::now().date_naive())
    });
    info!("Saving file to: {}", path_output.display());
    let mut writer = XlsxWriter::with_default_formats(&path_output);
    writer
        .write_sheet(
            &result.df,
            &options.sheet_name,
            &derive_sheet_write_options(pivot_options.cols_fixed.len()),
        )
        .context("Failed to build output workbook")?;
    writer
        .close()
        .with_context(|| format!("Failed to save {}", writer.file_out().display()))?;
    info!("Processing finished successfully!");

    if options.if_open_result {
        match open_in_default_viewer(&path_output) {
            Ok(()) => info!("File opened automatically: {}", path_output.display()),
            Err(err) => {
                warn!("Could not open the file automatically: {err}");
                warn!("You can open the file manually from the BD BNN folder.");
            }
        }
    }

    Ok(EnumRunOutcome::Written {
        path_output,
        report: result.report,
    })
}
