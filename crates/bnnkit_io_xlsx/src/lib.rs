//! `bnnkit_io_xlsx` v1:
//! Spreadsheet read/write kernel for dataframe tables.
//!
//! Modules:
//! - `conf`   : Excel limits and format presets
//! - `spec`   : format/option/report/error models
//! - `util`   : pure conversion and naming helpers
//! - `reader` : first-sheet workbook reader (calamine)
//! - `writer` : stateful workbook writer (rust_xlsxwriter)
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{C_SHEET_NAME_DEFAULT, derive_default_xlsx_formats};
pub use reader::{derive_dataframe_from_range, read_first_sheet};
pub use spec::{
    EnumAutofitColumnsRule, ReportWorkbook, SpecAutofitCellsPolicy, SpecCellFormat,
    SpecSheetSlice, SpecSheetWriteOptions, SpecXlsxFormats, XlsxIoError,
};
pub use writer::XlsxWriter;
