//! First-sheet XLSX/XLS reader producing a dataframe.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use log::debug;
use polars::prelude::{Column, DataFrame, PlSmallStr};

use crate::spec::XlsxIoError;
use crate::util::{derive_unique_headers, format_number_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumInferredDtype {
    Integer,
    Float,
    Text,
}

/// Read the first worksheet of `path` into a dataframe.
///
/// The first row is the header. Fully blank data rows are dropped.
pub fn read_first_sheet(path: &Path) -> Result<DataFrame, XlsxIoError> {
    let mut workbook = open_workbook_auto(path)?;
    let l_sheet_names = workbook.sheet_names();
    let Some(sheet_name) = l_sheet_names.first() else {
        return Err(XlsxIoError::NoWorksheet(path.display().to_string()));
    };
    debug!("Reading sheet {sheet_name:?} from {}", path.display());

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| XlsxIoError::NoWorksheet(path.display().to_string()))??;
    derive_dataframe_from_range(&range)
}

/// Convert a cell range (header row + data rows) into a dataframe.
///
/// Column dtypes: all non-empty cells integral numbers -> `Int64`, all numeric
/// -> `Float64`, otherwise `String`.
pub fn derive_dataframe_from_range(range: &Range<Data>) -> Result<DataFrame, XlsxIoError> {
    let mut iter_rows = range.rows();
    let Some(row_header) = iter_rows.next() else {
        return Ok(DataFrame::empty());
    };

    let l_headers_raw: Vec<String> = row_header.iter().map(derive_header_text).collect();
    let l_headers = derive_unique_headers(&l_headers_raw);

    let l_rows: Vec<&[Data]> = iter_rows
        .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .collect();
    debug!(
        "Range holds {} data row(s) and {} column(s)",
        l_rows.len(),
        l_headers.len()
    );

    let mut l_columns = Vec::with_capacity(l_headers.len());
    for (n_idx_col, c_header) in l_headers.iter().enumerate() {
        let l_cells: Vec<&Data> = l_rows
            .iter()
            .map(|row| row.get(n_idx_col).unwrap_or(&Data::Empty))
            .collect();
        l_columns.push(derive_column(c_header, &l_cells));
    }

    Ok(DataFrame::new(l_columns)?)
}

fn derive_column(name: &str, cells: &[&Data]) -> Column {
    let name = PlSmallStr::from(name);
    match infer_dtype(cells) {
        EnumInferredDtype::Integer => Column::new(
            name,
            cells
                .iter()
                .map(|cell| derive_cell_f64(cell).map(|n| n as i64))
                .collect::<Vec<Option<i64>>>(),
        ),
        EnumInferredDtype::Float => Column::new(
            name,
            cells
                .iter()
                .map(|cell| derive_cell_f64(cell))
                .collect::<Vec<Option<f64>>>(),
        ),
        EnumInferredDtype::Text => Column::new(
            name,
            cells
                .iter()
                .map(|cell| derive_cell_text(cell))
                .collect::<Vec<Option<String>>>(),
        ),
    }
}

fn infer_dtype(cells: &[&Data]) -> EnumInferredDtype {
    let mut enum_dtype = EnumInferredDtype::Integer;
    let mut if_any_value = false;
    for cell in cells {
        if matches!(cell, Data::Empty) {
            continue;
        }
        if_any_value = true;
        match derive_cell_f64(cell) {
            Some(n) if n.fract() == 0.0 && n.abs() < 1e15 => {}
            Some(_) => enum_dtype = EnumInferredDtype::Float,
            None => return EnumInferredDtype::Text,
        }
    }
    if if_any_value {
        enum_dtype
    } else {
        EnumInferredDtype::Text
    }
}

fn derive_cell_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(val) => Some(*val as f64),
        Data::Float(val) => Some(*val),
        Data::DateTime(val) => Some(val.as_f64()),
        _ => None,
    }
}

fn derive_cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(val) => Some(val.clone()),
        Data::Int(val) => Some(val.to_string()),
        Data::Float(val) => Some(format_number_text(*val)),
        Data::Bool(val) => Some(if *val { "True" } else { "False" }.to_string()),
        Data::DateTime(val) => Some(format_number_text(val.as_f64())),
        Data::DateTimeIso(val) => Some(val.clone()),
        Data::DurationIso(val) => Some(val.clone()),
        Data::Error(val) => Some(val.to_string()),
    }
}

fn derive_header_text(cell: &Data) -> String {
    derive_cell_text(cell).unwrap_or_default()
}
