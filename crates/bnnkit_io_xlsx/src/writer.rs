//! XLSX writer kernel that renders dataframes into workbook sheets.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use polars::prelude::DataFrame;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, derive_default_xlsx_formats};
use crate::spec::{
    EnumAutofitColumnsRule, EnumCellValue, EnumColumnKind, ReportWorkbook, SpecCellFormat,
    SpecSheetSlice, SpecSheetWriteOptions, SpecXlsxFormats, XlsxIoError,
};
use crate::util::{
    cast_col_num, cast_row_num, derive_cell_value, derive_column_kind, estimate_cell_width,
    estimate_text_width, plan_column_widths, plan_sheet_slices, sanitize_sheet_name,
};

/// Stateful workbook writer.
///
/// Sheets are buffered in memory until [`Self::close`] saves the file.
pub struct XlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    formats: SpecXlsxFormats,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<ReportWorkbook>,
    if_closed: bool,
}

impl XlsxWriter {
    /// Create writer bound to an output path and format presets.
    pub fn new(path_file_out: impl Into<PathBuf>, formats: SpecXlsxFormats) -> Self {
        Self {
            path_file_out: path_file_out.into(),
            workbook: Workbook::new(),
            formats,
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Create writer with [`derive_default_xlsx_formats`].
    pub fn with_default_formats(path_file_out: impl Into<PathBuf>) -> Self {
        Self::new(path_file_out, derive_default_xlsx_formats())
    }

    /// Return the output path the workbook is saved to.
    pub fn file_out(&self) -> &Path {
        &self.path_file_out
    }

    /// Return per-call write reports.
    pub fn report(&self) -> &[ReportWorkbook] {
        &self.l_reports
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), XlsxIoError> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook.save(&self.path_file_out)?;
        self.if_closed = true;
        debug!("Saved workbook to {}", self.path_file_out.display());
        Ok(())
    }

    /// Write one dataframe as a sheet (split when it exceeds Excel limits).
    ///
    /// The header row uses column names; null and empty-text cells stay blank.
    pub fn write_sheet(
        &mut self,
        df: &DataFrame,
        sheet_name: &str,
        options: &SpecSheetWriteOptions,
    ) -> Result<ReportWorkbook, XlsxIoError> {
        if self.if_closed {
            return Err(XlsxIoError::Closed);
        }

        let l_colnames: Vec<String> = df
            .get_column_names_str()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        let l_kinds: Vec<EnumColumnKind> = df
            .get_columns()
            .iter()
            .map(|col| derive_column_kind(col.dtype()))
            .collect();

        let mut report = ReportWorkbook::default();
        let c_sheet_name = sanitize_sheet_name(sheet_name, "_");
        if c_sheet_name != sheet_name {
            report.warn(format!("Sheet name {sheet_name:?} sanitized to {c_sheet_name:?}."));
        }
        let l_slices = plan_sheet_slices(df.height(), l_colnames.len(), &c_sheet_name, &mut report);

        let fmt_header = derive_rust_xlsx_format(&self.formats.header);
        let fmt_text = derive_rust_xlsx_format(&self.formats.text);
        let fmt_integer = derive_rust_xlsx_format(&self.formats.integer);
        let fmt_decimal = derive_rust_xlsx_format(&self.formats.decimal);

        for sheet_slice in l_slices {
            let sheet_name_unique = self.derive_unique_sheet_name(&sheet_slice.sheet_name);
            let worksheet = self.workbook.add_worksheet();
            worksheet.set_name(&sheet_name_unique)?;

            let n_cols_slice = sheet_slice.col_end_exclusive - sheet_slice.col_start_inclusive;
            let n_rows_slice = sheet_slice.row_end_exclusive - sheet_slice.row_start_inclusive;
            let mut l_width_by_col = vec![0usize; n_cols_slice];

            for n_idx_col in 0..n_cols_slice {
                let c_name = &l_colnames[sheet_slice.col_start_inclusive + n_idx_col];
                worksheet.write_string_with_format(
                    0,
                    cast_col_num(n_idx_col)?,
                    c_name,
                    &fmt_header,
                )?;
                l_width_by_col[n_idx_col] = estimate_text_width(c_name);
            }

            if options.if_freeze_header {
                worksheet.set_freeze_panes(1, cast_col_num(options.col_freeze)?)?;
            }

            let if_autofit_body = matches!(
                options.policy_autofit.rule_columns,
                EnumAutofitColumnsRule::All
            );
            let n_rows_inferred_max = options
                .policy_autofit
                .height_body_inferred_max
                .unwrap_or(usize::MAX);

            for n_idx_col in 0..n_cols_slice {
                let n_idx_col_abs = sheet_slice.col_start_inclusive + n_idx_col;
                let kind = l_kinds[n_idx_col_abs];
                let format = match kind {
                    EnumColumnKind::Text => &fmt_text,
                    EnumColumnKind::Integer => &fmt_integer,
                    EnumColumnKind::Decimal => &fmt_decimal,
                };
                let col = df.get_columns()[n_idx_col_abs]
                    .slice(sheet_slice.row_start_inclusive as i64, n_rows_slice);

                for n_row_local in 0..n_rows_slice {
                    let value = derive_cell_value(col.get(n_row_local)?);
                    if if_autofit_body && n_row_local < n_rows_inferred_max {
                        l_width_by_col[n_idx_col] = usize::max(
                            l_width_by_col[n_idx_col],
                            estimate_cell_width(&value, kind),
                        );
                    }
                    write_cell_with_format(worksheet, n_row_local + 1, n_idx_col, &value, format)?;
                }
            }

            let l_widths = plan_column_widths(&l_width_by_col, &options.policy_autofit);
            for (n_idx_col, n_width) in l_widths.iter().enumerate() {
                worksheet.set_column_width(cast_col_num(n_idx_col)?, *n_width as f64)?;
            }

            debug!(
                "Wrote sheet {sheet_name_unique:?}: rows [{}, {}), cols [{}, {})",
                sheet_slice.row_start_inclusive,
                sheet_slice.row_end_exclusive,
                sheet_slice.col_start_inclusive,
                sheet_slice.col_end_exclusive,
            );
            report.sheets.push(SpecSheetSlice {
                sheet_name: sheet_name_unique,
                widths: l_widths,
                ..sheet_slice
            });
        }

        for c_warning in &report.warnings {
            warn!("{c_warning}");
        }
        self.l_reports.push(report.clone());
        Ok(report)
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if self.set_sheet_names_existing.insert(name.to_string()) {
            return name.to_string();
        }

        let c_base: String = name
            .chars()
            .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
            .collect();
        let mut n_idx = 2usize;
        loop {
            let c_candidate: String = format!("{c_base}__{n_idx}")
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX)
                .collect();
            if self.set_sheet_names_existing.insert(c_candidate.clone()) {
                return c_candidate;
            }
            n_idx += 1;
        }
    }
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), XlsxIoError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::None => {}
        EnumCellValue::Text(val) => {
            worksheet.write_string_with_format(n_row, n_col, val, format)?;
        }
        EnumCellValue::Number(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val, format)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.as_str());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.as_str());
    }
    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        5 => FormatBorder::Thick,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    match align.trim().to_ascii_lowercase().as_str() {
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use calamine::{Data, Reader, Xlsx, open_workbook};
    use polars::prelude::{Column, PlSmallStr};

    use super::*;
    use crate::spec::SpecAutofitCellsPolicy;

    fn create_df() -> DataFrame {
        DataFrame::new(vec![
            Column::new(PlSmallStr::from("PO #"), vec!["100", "200"]),
            Column::new(PlSmallStr::from("M"), vec![Some(5i64), None]),
            Column::new(PlSmallStr::from("Description"), vec!["Tee", ""]),
        ])
        .unwrap()
    }

    #[test]
    fn write_sheet_round_trips_header_values_and_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut writer = XlsxWriter::with_default_formats(&path);
        let report = writer
            .write_sheet(&create_df(), "Sheet1", &SpecSheetWriteOptions::default())
            .unwrap();
        assert_eq!(report.sheets.len(), 1);
        writer.close().unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Sheet1".to_string()]);
        let range = workbook.worksheet_range("Sheet1").unwrap();
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("PO #".to_string())));
        assert_eq!(range.get_value((1, 1)), Some(&Data::Float(5.0)));
        assert!(matches!(range.get_value((2, 1)), None | Some(Data::Empty)));
        assert!(matches!(range.get_value((2, 2)), None | Some(Data::Empty)));
    }

    #[test]
    fn write_after_close_fails_and_close_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = XlsxWriter::with_default_formats(dir.path().join("out.xlsx"));
        writer
            .write_sheet(&create_df(), "Sheet1", &SpecSheetWriteOptions::default())
            .unwrap();
        writer.close().unwrap();
        writer.close().unwrap();

        let err = writer
            .write_sheet(&create_df(), "Sheet2", &SpecSheetWriteOptions::default())
            .unwrap_err();
        assert!(matches!(err, XlsxIoError::Closed));
    }

    #[test]
    fn repeated_and_illegal_sheet_names_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = XlsxWriter::with_default_formats(dir.path().join("out.xlsx"));
        let options = SpecSheetWriteOptions::default();

        writer.write_sheet(&create_df(), "BNN", &options).unwrap();
        let report = writer.write_sheet(&create_df(), "BNN", &options).unwrap();
        assert_eq!(report.sheets[0].sheet_name, "BNN__2");

        let report = writer.write_sheet(&create_df(), "a/b", &options).unwrap();
        assert_eq!(report.sheets[0].sheet_name, "a_b");
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(writer.report().len(), 3);
    }

    #[test]
    fn empty_dataframe_writes_an_empty_named_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        let mut writer = XlsxWriter::with_default_formats(&path);
        writer
            .write_sheet(&DataFrame::empty(), "Sheet1", &SpecSheetWriteOptions::default())
            .unwrap();
        writer.close().unwrap();

        let workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Sheet1".to_string()]);
    }

    #[test]
    fn autofit_rule_controls_measured_columns() {
        let dir = tempfile::tempdir().unwrap();
        let df = DataFrame::new(vec![
            Column::new(PlSmallStr::from("Description"), vec!["A very long style description"]),
            Column::new(PlSmallStr::from("TT"), vec![12_345i64]),
        ])
        .unwrap();
        let mut writer = XlsxWriter::with_default_formats(dir.path().join("widths.xlsx"));

        let report = writer
            .write_sheet(&df, "Header", &SpecSheetWriteOptions::default())
            .unwrap();
        assert_eq!(report.sheets[0].widths, vec![13, 6]);

        let options_all = SpecSheetWriteOptions {
            col_freeze: 1,
            policy_autofit: SpecAutofitCellsPolicy {
                rule_columns: EnumAutofitColumnsRule::All,
                ..Default::default()
            },
            ..Default::default()
        };
        let report = writer.write_sheet(&df, "All", &options_all).unwrap();
        assert_eq!(report.sheets[0].widths, vec![31, 7]);

        let options_none = SpecSheetWriteOptions {
            policy_autofit: SpecAutofitCellsPolicy {
                rule_columns: EnumAutofitColumnsRule::None,
                ..Default::default()
            },
            ..Default::default()
        };
        let report = writer.write_sheet(&df, "None", &options_none).unwrap();
        assert!(report.sheets[0].widths.is_empty());
        writer.close().unwrap();
    }
}
