//! XLSX limits and format presets.

use crate::spec::{SpecCellFormat, SpecXlsxFormats};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Sheet name used when the caller does not pick one.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";

/// Build default cell formats used by [`crate::writer::XlsxWriter`].
pub fn derive_default_xlsx_formats() -> SpecXlsxFormats {
    let fmt_base = SpecCellFormat {
        font_name: Some("Calibri".to_string()),
        font_size: Some(11),
        ..Default::default()
    };

    SpecXlsxFormats {
        text: fmt_base.clone(),
        integer: fmt_base.with_(SpecCellFormat {
            num_format: Some("0".to_string()),
            ..Default::default()
        }),
        decimal: fmt_base.with_(SpecCellFormat {
            num_format: Some("0.00".to_string()),
            ..Default::default()
        }),
        header: fmt_base.with_(SpecCellFormat {
            bold: Some(true),
            border: Some(1),
            align: Some("center".to_string()),
            ..Default::default()
        }),
    }
}
