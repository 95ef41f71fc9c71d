//! Shared XLSX models: formats, write options, reports and errors.

use polars::prelude::PolarsError;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification; `None` fields inherit from the base format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Horizontal alignment (`left`, `center`, `right`).
    pub align: Option<String>,
    /// Border style for all sides (0 none, 1 thin, 2 medium, 5 thick).
    pub border: Option<i64>,
    /// Number format code.
    pub num_format: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            border: other.border.or(self.border),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
        }
    }
}

/// Format presets by column kind plus the header format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxFormats {
    /// Text columns.
    pub text: SpecCellFormat,
    /// Integer columns.
    pub integer: SpecCellFormat,
    /// Floating-point columns.
    pub decimal: SpecCellFormat,
    /// Header row.
    pub header: SpecCellFormat,
}

/// Column rendering kind, inferred from the dataframe dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumColumnKind {
    /// Anything that is not numeric.
    Text,
    /// Integer dtypes.
    Integer,
    /// Floating-point dtypes.
    Decimal,
}

/// Normalized cell value during the write pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    Text(String),
    /// Numeric value.
    Number(f64),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Autofit rule for column width inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumAutofitColumnsRule {
    /// Disable autofit.
    None,
    /// Infer width from header cells only (default).
    #[default]
    Header,
    /// Infer width from header and body cells.
    All,
}

/// Column width inference policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    /// Width inference rule.
    pub rule_columns: EnumAutofitColumnsRule,
    /// Max body rows inspected when body-based inference is active.
    pub height_body_inferred_max: Option<usize>,
    /// Minimum final width.
    pub width_cell_min: usize,
    /// Maximum final width.
    pub width_cell_max: usize,
    /// Width padding added after inference.
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            rule_columns: EnumAutofitColumnsRule::Header,
            height_body_inferred_max: Some(20_000),
            width_cell_min: 6,
            width_cell_max: 50,
            width_cell_padding: 2,
        }
    }
}

/// Per-sheet write options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetWriteOptions {
    /// Freeze the header row.
    pub if_freeze_header: bool,
    /// Number of frozen leading columns (applied with the frozen header).
    pub col_freeze: usize,
    /// Column autofit policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
}

impl Default for SpecSheetWriteOptions {
    fn default() -> Self {
        Self {
            if_freeze_header: true,
            col_freeze: 0,
            policy_autofit: SpecAutofitCellsPolicy::default(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Concrete worksheet emitted for a dataframe (after Excel-limit slicing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetSlice {
    /// Actual unique sheet name in workbook.
    pub sheet_name: String,
    /// Inclusive source row start.
    pub row_start_inclusive: usize,
    /// Exclusive source row end.
    pub row_end_exclusive: usize,
    /// Inclusive source column start.
    pub col_start_inclusive: usize,
    /// Exclusive source column end.
    pub col_end_exclusive: usize,
    /// Column widths applied to the sheet; empty when autofit is disabled.
    pub widths: Vec<usize>,
}

/// Per-write-call report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportWorkbook {
    /// Sheet slices produced by the write call.
    pub sheets: Vec<SpecSheetSlice>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl ReportWorkbook {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// XLSX read/write failures.
#[derive(Debug, Error)]
pub enum XlsxIoError {
    /// Workbook could not be opened or parsed.
    #[error("XLSX read error: {0}")]
    Read(#[from] calamine::Error),

    /// Workbook could not be built or saved.
    #[error("XLSX write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// Dataframe conversion failure.
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Workbook has no worksheet to read.
    #[error("Workbook contains no sheets: {0}")]
    NoWorksheet(String),

    /// Input violates a writer precondition.
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// Write attempted after `close()`.
    #[error("Cannot write after close().")]
    Closed,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_right_side_values() {
        let fmt_base = SpecCellFormat {
            font_name: Some("Calibri".to_string()),
            bold: Some(false),
            ..Default::default()
        };
        let fmt = fmt_base.with_(SpecCellFormat {
            bold: Some(true),
            num_format: Some("0".to_string()),
            ..Default::default()
        });

        assert_eq!(fmt.font_name.as_deref(), Some("Calibri"));
        assert_eq!(fmt.bold, Some(true));
        assert_eq!(fmt.num_format.as_deref(), Some("0"));
        assert_eq!(fmt.align, None);
    }
}
