//! BD BNN constants: size-group taxonomy and column layout presets.

use crate::spec::{SpecPivotOptions, SpecSizeGroup};

/// Purchase-order number column (grouping key).
pub const C_COL_PO: &str = "PO #";
/// Color code column (grouping key).
pub const C_COL_COLOR: &str = "Color Code";
/// Size label column.
pub const C_COL_SIZE: &str = "Size";
/// Ordered quantity column.
pub const C_COL_QUANTITY: &str = "Ordered Item Quantity";
/// Per-row total column inserted after the size columns.
pub const C_COL_TOTAL: &str = "TT";

/// Size groups in declaration order. Labels are unique across groups.
pub const TUP_SIZE_GROUPS: [(&str, &[&str]); 4] = [
    ("Grp A", &["XXS", "XS", "S", "M", "L", "XL", "XXL", "1X"]),
    ("Grp B", &["XXSP", "XSP", "SP", "MP", "LP"]),
    ("Grp C", &["XST", "ST", "MT", "LT", "XLT"]),
    ("Grp D", &["M/T", "L/T", "XL/T", "XXL/T"]),
];

/// Leading attribute columns, copied from the first contributing row.
pub const TUP_COLS_FIXED: [&str; 8] = [
    "Vendor",
    "Order Class",
    "PO #",
    "Market PO No.",
    "Buyer Item #",
    "Style Description",
    "Color Desc",
    "Color Code",
];

/// Attribute columns placed after the size and total columns.
pub const TUP_COLS_TRAILING: [&str; 6] = [
    "Gap Sku",
    "Destination Country",
    "PO Channel Desc",
    "Retail Cost Currency",
    "Retail Cost",
    "Final Destination",
];

/// Build the BD BNN size-group taxonomy.
pub fn derive_default_size_groups() -> Vec<SpecSizeGroup> {
    TUP_SIZE_GROUPS
        .iter()
        .map(|(name, sizes)| SpecSizeGroup {
            name: (*name).to_string(),
            sizes: sizes.iter().map(|s| (*s).to_string()).collect(),
        })
        .collect()
}

/// Build default pivot options (BD BNN layout).
pub fn derive_default_pivot_options() -> SpecPivotOptions {
    SpecPivotOptions {
        size_groups: derive_default_size_groups(),
        cols_fixed: TUP_COLS_FIXED.iter().map(|s| (*s).to_string()).collect(),
        cols_trailing: TUP_COLS_TRAILING.iter().map(|s| (*s).to_string()).collect(),
        col_po: C_COL_PO.to_string(),
        col_color: C_COL_COLOR.to_string(),
        col_size: C_COL_SIZE.to_string(),
        col_quantity: C_COL_QUANTITY.to_string(),
        col_total: C_COL_TOTAL.to_string(),
        if_check_consistent_attributes: false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn default_taxonomy_labels_are_unique() {
        let l_labels: Vec<&str> = TUP_SIZE_GROUPS
            .iter()
            .flat_map(|(_, sizes)| sizes.iter().copied())
            .collect();
        let set_labels: BTreeSet<&str> = l_labels.iter().copied().collect();
        assert_eq!(l_labels.len(), 22);
        assert_eq!(set_labels.len(), l_labels.len());
    }

    #[test]
    fn default_options_validate() {
        let options = derive_default_pivot_options();
        assert!(options.validate().is_ok());
        assert_eq!(options.size_groups[3].name, "Grp D");
        assert_eq!(options.size_groups[3].sizes[0], "M/T");
    }
}
