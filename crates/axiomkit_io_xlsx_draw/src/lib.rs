//! `axiomkit_io_xlsx_draw` v1:
//! Cursor-based layout of styled elements on XLSX worksheets.
//!
//! Modules:
//! - `conf`       : constants and default presets
//! - `spec`       : specs/models/options
//! - `error`      : crate error type
//! - `util`       : pure helper functions
//! - `surface`    : grid surface trait, worksheet backend and in-memory recorder
//! - `drawer`     : drawing cursor and the `Drawable` trait
//! - `element`    : atomic drawable unit
//! - `series`     : one-dimensional composite
//! - `table`      : column table composite
//! - `dictionary` : key/value composite and its YAML loader
//! - `writer`     : workbook writer handing out drawers
pub mod conf;
pub mod dictionary;
pub mod drawer;
pub mod element;
pub mod error;
pub mod series;
pub mod spec;
pub mod surface;
pub mod table;
pub mod util;
pub mod writer;

pub use conf::{
    N_DICT_HSPACE_DEFAULT, N_DICT_NESTING_DEPTH_MAX, N_DICT_VSPACE_DEFAULT,
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, N_PADDING_AUTOFIT_DEFAULT,
    N_WIDTH_EXCEL_COLUMN_MAX, TUP_EXCEL_ILLEGAL, derive_default_draw_formats,
};
pub use dictionary::{
    Dictionary, EnumDictValue, SpecDictCell, SpecDictCellParams, SpecDictPair,
    SpecDictionaryOptions,
};
pub use drawer::{Drawable, Drawer};
pub use element::{Element, EnumElementProperty};
pub use error::{DrawResult, XlsxDrawError};
pub use series::{Series, SpecSeriesOptions};
pub use spec::{
    EnumBorderSide, EnumBoundaryStyle, EnumCellValue, EnumCellWrite, EnumColumnWidth,
    EnumOrientation, EnumWriteMethod, SpecCellComment, SpecCellFormat, SpecCommentOptions,
    SpecExtent, SpecPosition, SpecRichSegment,
};
pub use surface::{EnumSurfaceOp, GridSurface, SheetRecorder, derive_rust_xlsx_format};
pub use table::{SpecCellOverride, SpecColumnOverride, SpecTableBorders, SpecTableOptions, Table};
pub use util::{
    derive_a1_cell, derive_a1_range, derive_column_letters, merge_styles, parse_a1_cell,
    sanitize_sheet_name,
};
pub use writer::XlsxDrawWriter;
