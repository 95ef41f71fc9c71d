//! Stateless helpers shared by the XLSX reader and writer.

use polars::prelude::{AnyValue, DataType};

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{
    EnumAutofitColumnsRule, EnumCellValue, EnumColumnKind, ReportWorkbook, SpecAutofitCellsPolicy,
    SpecSheetSlice, XlsxIoError,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Render a number the way a spreadsheet shows it (`100`, not `100.0`).
pub fn format_number_text(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Map a dataframe dtype to its rendering kind.
pub fn derive_column_kind(dtype: &DataType) -> EnumColumnKind {
    if dtype.is_integer() {
        EnumColumnKind::Integer
    } else if dtype.is_float() {
        EnumColumnKind::Decimal
    } else {
        EnumColumnKind::Text
    }
}

/// Normalize one dataframe cell for writing; empty text becomes blank.
pub fn derive_cell_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) if val.is_empty() => EnumCellValue::None,
        AnyValue::String(val) => EnumCellValue::Text(val.to_string()),
        AnyValue::StringOwned(val) if val.is_empty() => EnumCellValue::None,
        AnyValue::StringOwned(val) => EnumCellValue::Text(val.to_string()),
        AnyValue::Boolean(val) => {
            EnumCellValue::Text(if val { "True" } else { "False" }.to_string())
        }
        AnyValue::UInt8(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt16(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt32(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int8(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int16(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float32(val) if val.is_finite() => EnumCellValue::Number(val as f64),
        AnyValue::Float64(val) if val.is_finite() => EnumCellValue::Number(val),
        AnyValue::Float32(_) | AnyValue::Float64(_) => EnumCellValue::None,
        _ => EnumCellValue::Text(value.to_string()),
    }
}

/// Estimate displayed width units of a text (wide glyphs count 1.6).
pub fn estimate_text_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

/// Estimate displayed width units of a normalized cell.
pub fn estimate_cell_width(value: &EnumCellValue, kind: EnumColumnKind) -> usize {
    match value {
        EnumCellValue::None => 0,
        EnumCellValue::Text(s) => estimate_text_width(s),
        EnumCellValue::Number(n) => match kind {
            EnumColumnKind::Integer => format_number_text(*n).len(),
            EnumColumnKind::Decimal => format!("{n:.2}").len(),
            EnumColumnKind::Text => format_number_text(*n).len(),
        },
    }
}

/// Clamp measured widths into the policy range; empty when autofit is off.
pub fn plan_column_widths(
    l_widths_measured: &[usize],
    policy: &SpecAutofitCellsPolicy,
) -> Vec<usize> {
    if matches!(policy.rule_columns, EnumAutofitColumnsRule::None) {
        return Vec::new();
    }
    let n_min = usize::max(1, policy.width_cell_min);
    let n_max = usize::min(255, usize::max(n_min, policy.width_cell_max));
    l_widths_measured
        .iter()
        .map(|n_width| {
            usize::min(n_max, usize::max(n_min, n_width + policy.width_cell_padding))
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to a valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    let c_name = c_name.trim().trim_matches('\'');
    if c_name.is_empty() {
        return "Sheet".to_string();
    }
    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Create suffixed sheet name (`base_1`, `base_2`, ...), respecting length cap.
pub fn create_sheet_identifier(base_name: &str, part_idx_1based: usize) -> String {
    let c_suffix = format!("_{part_idx_1based}");
    let n_len_base_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_suffix.len());
    let c_base: String = base_name.chars().take(usize::max(1, n_len_base_max)).collect();
    format!("{c_base}{c_suffix}")
}

/// Split a dataframe range into Excel-compliant sheet slices (columns first).
///
/// A table with no columns still yields one empty slice so the workbook
/// always holds the named sheet.
pub fn plan_sheet_slices(
    height_df: usize,
    width_df: usize,
    sheet_name: &str,
    report: &mut ReportWorkbook,
) -> Vec<SpecSheetSlice> {
    let n_rows_data_max = N_NROWS_EXCEL_MAX - 1;

    let l_col_slices = derive_slices(width_df, N_NCOLS_EXCEL_MAX);
    let l_row_slices = derive_slices(height_df, n_rows_data_max);
    let n_parts_total = l_col_slices.len() * l_row_slices.len();

    let mut l_sheet_parts = Vec::with_capacity(n_parts_total);
    for (col_start, col_end) in &l_col_slices {
        for (row_start, row_end) in &l_row_slices {
            let sheet_name_part = if n_parts_total == 1 {
                sheet_name.to_string()
            } else {
                create_sheet_identifier(sheet_name, l_sheet_parts.len() + 1)
            };
            l_sheet_parts.push(SpecSheetSlice {
                sheet_name: sheet_name_part,
                row_start_inclusive: *row_start,
                row_end_exclusive: *row_end,
                col_start_inclusive: *col_start,
                col_end_exclusive: *col_end,
                widths: Vec::new(),
            });
        }
    }

    if n_parts_total > 1 {
        report.warn(format!(
            "Excel limit overflow: split into {n_parts_total} sheets (columns-first, then rows)."
        ));
    }
    l_sheet_parts
}

fn derive_slices(n_total: usize, n_step: usize) -> Vec<(usize, usize)> {
    if n_total == 0 {
        return vec![(0, 0)];
    }
    (0..n_total)
        .step_by(n_step)
        .map(|n_start| (n_start, usize::min(n_total, n_start + n_step)))
        .collect()
}

/// Cast a zero-based row index to the writer's row type.
pub fn cast_row_num(value: usize) -> Result<u32, XlsxIoError> {
    u32::try_from(value).map_err(|_| XlsxIoError::Invalid(format!("row index overflow: {value}")))
}

/// Cast a zero-based column index to the writer's column type.
pub fn cast_col_num(value: usize) -> Result<u16, XlsxIoError> {
    u16::try_from(value)
        .map_err(|_| XlsxIoError::Invalid(format!("column index overflow: {value}")))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderUtils

/// Make header names usable as dataframe columns.
///
/// Blank headers become `Unnamed: <idx>`; repeats get `.1`, `.2`, ... suffixes.
pub fn derive_unique_headers(headers: &[String]) -> Vec<String> {
    let mut l_headers: Vec<String> = Vec::with_capacity(headers.len());
    for (n_idx, c_header) in headers.iter().enumerate() {
        let c_base = if c_header.trim().is_empty() {
            format!("Unnamed: {n_idx}")
        } else {
            c_header.clone()
        };

        let mut c_candidate = c_base.clone();
        let mut n_suffix = 1usize;
        while l_headers.contains(&c_candidate) {
            c_candidate = format!("{c_base}.{n_suffix}");
            n_suffix += 1;
        }
        l_headers.push(c_candidate);
    }
    l_headers
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
