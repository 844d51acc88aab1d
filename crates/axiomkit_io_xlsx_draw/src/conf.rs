//! Drawing constants and default preset factories.

use std::collections::BTreeMap;

use crate::spec::SpecCellFormat;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Excel maximum column width in character units.
pub const N_WIDTH_EXCEL_COLUMN_MAX: f64 = 255.0;

/// Padding added on both sides of auto-fitted column widths.
pub const N_PADDING_AUTOFIT_DEFAULT: f64 = 2.0;
/// Default number of blank columns between dictionary keys and values.
pub const N_DICT_HSPACE_DEFAULT: usize = 1;
/// Default number of blank rows between dictionary pairs.
pub const N_DICT_VSPACE_DEFAULT: usize = 0;
/// Deepest allowed dictionary nesting (top level is depth 0).
pub const N_DICT_NESTING_DEPTH_MAX: usize = 32;

/// Build default named format presets for drawn reports.
///
/// Keys: `text`, `header`, `key`, `value`.
pub fn derive_default_draw_formats() -> BTreeMap<String, SpecCellFormat> {
    let cfg_base_fmt_spec = SpecCellFormat {
        font_name: Some("Times New Roman".to_string()),
        font_size: Some(11),
        align: Some("left".to_string()),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    };

    let mut dict_fmt = BTreeMap::new();
    dict_fmt.insert("text".to_string(), cfg_base_fmt_spec.clone());
    dict_fmt.insert(
        "header".to_string(),
        cfg_base_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            align: Some("center".to_string()),
            border: Some(1),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        "key".to_string(),
        cfg_base_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        "value".to_string(),
        cfg_base_fmt_spec.with_(SpecCellFormat {
            text_wrap: Some(true),
            ..Default::default()
        }),
    );

    dict_fmt
}
