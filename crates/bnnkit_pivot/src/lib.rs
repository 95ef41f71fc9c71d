//! `bnnkit_pivot` v1:
//! Size-group pivot kernel for BD BNN purchase-order line items.
//!
//! Modules:
//! - `conf`  : taxonomy and column-layout constants
//! - `spec`  : options/report/error models
//! - `util`  : pure helper functions
//! - `pivot` : the pivot transform
pub mod conf;
pub mod pivot;
pub mod spec;
pub mod util;

pub use conf::{
    C_COL_COLOR, C_COL_PO, C_COL_QUANTITY, C_COL_SIZE, C_COL_TOTAL, TUP_COLS_FIXED,
    TUP_COLS_TRAILING, TUP_SIZE_GROUPS, derive_default_pivot_options, derive_default_size_groups,
};
pub use pivot::{pivot_table, pivot_table_with_report};
pub use spec::{
    EnumKeyValue, PivotError, ReportPivot, ResultPivot, SpecPivotOptions, SpecSizeGroup,
};
pub use util::plan_output_columns;
