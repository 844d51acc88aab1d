//! Stateless helper utilities shared by the drawer, elements and surfaces.

use std::sync::LazyLock;

use regex::Regex;
use rust_xlsxwriter::utility::{column_number_to_name, row_col_to_cell};

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::error::{DrawResult, XlsxDrawError};
use crate::spec::{
    EnumCellValue, EnumCellWrite, EnumWriteMethod, SpecCellFormat, SpecExtent, SpecPosition,
};

static RE_A1_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?([A-Za-z]{1,3})\$?([0-9]{1,7})$").expect("A1 cell pattern is valid")
});

////////////////////////////////////////////////////////////////////////////////
// #region StyleMerging

/// Shallow last-wins overlay of `overlay` onto `base`.
pub fn merge_styles(base: &SpecCellFormat, overlay: &SpecCellFormat) -> SpecCellFormat {
    base.merge(overlay)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region GridValidation

/// Check that `(row, col)` is an addressable worksheet cell.
pub fn validate_position(row: usize, col: usize) -> DrawResult<()> {
    if row >= N_NROWS_EXCEL_MAX || col >= N_NCOLS_EXCEL_MAX {
        return Err(XlsxDrawError::OutOfGrid { row, col });
    }
    Ok(())
}

/// Check that an element of `extent` fits in the grid when anchored at `position`.
///
/// Zero-sized extents are rejected.
pub fn validate_region(position: SpecPosition, extent: SpecExtent) -> DrawResult<()> {
    let err = |reason: &str| XlsxDrawError::InvalidExtent {
        row: position.row,
        col: position.col,
        height: extent.height,
        width: extent.width,
        reason: reason.to_string(),
    };

    if extent.height == 0 || extent.width == 0 {
        return Err(err("height and width must be >= 1"));
    }
    let if_rows_fit = position
        .row
        .checked_add(extent.height)
        .is_some_and(|n_end| n_end <= N_NROWS_EXCEL_MAX);
    if !if_rows_fit {
        return Err(err("region extends below the last worksheet row"));
    }
    let if_cols_fit = position
        .col
        .checked_add(extent.width)
        .is_some_and(|n_end| n_end <= N_NCOLS_EXCEL_MAX);
    if !if_cols_fit {
        return Err(err("region extends past the last worksheet column"));
    }
    Ok(())
}

/// Like [`validate_region`], but an empty extent is accepted (nothing is drawn).
pub fn validate_region_allow_empty(position: SpecPosition, extent: SpecExtent) -> DrawResult<()> {
    if extent.is_empty() {
        return Ok(());
    }
    validate_region(position, extent)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellReferences

/// A1 reference for a zero-based `(row, col)`, e.g. `(2, 1)` -> `B3`.
pub fn derive_a1_cell(row: usize, col: usize) -> DrawResult<String> {
    Ok(row_col_to_cell(cast_row_num(row)?, cast_col_num(col)?))
}

/// A1 range reference covering `extent` from `position`, e.g. `A1:C2`.
pub fn derive_a1_range(position: SpecPosition, extent: SpecExtent) -> DrawResult<String> {
    validate_region(position, extent)?;
    let c_first = derive_a1_cell(position.row, position.col)?;
    let c_last = derive_a1_cell(
        position.row + extent.height - 1,
        position.col + extent.width - 1,
    )?;
    Ok(format!("{c_first}:{c_last}"))
}

/// Column letters for a zero-based column index, e.g. `27` -> `AB`.
pub fn derive_column_letters(col: usize) -> DrawResult<String> {
    Ok(column_number_to_name(cast_col_num(col)?))
}

/// Parse an A1 reference (optionally with `$` markers) into a zero-based position.
pub fn parse_a1_cell(reference: &str) -> DrawResult<SpecPosition> {
    let invalid = || XlsxDrawError::InvalidCellReference(reference.to_string());

    let caps = RE_A1_CELL.captures(reference.trim()).ok_or_else(invalid)?;
    let c_letters = &caps[1];
    let n_row_1based: usize = caps[2].parse().map_err(|_| invalid())?;
    if n_row_1based == 0 {
        return Err(invalid());
    }

    let n_col_1based = c_letters
        .chars()
        .fold(0usize, |acc, chr| {
            acc * 26 + (chr.to_ascii_uppercase() as usize - 'A' as usize + 1)
        });

    let row = n_row_1based - 1;
    let col = n_col_1based - 1;
    validate_position(row, col).map_err(|_| invalid())?;
    Ok(SpecPosition { row, col })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellWriteResolution

/// Resolve value + write method into a concrete write for `(row, col)`.
///
/// Missing values (`None`, NaN, +/-Inf) become `na_rep` text, or a formatted
/// blank when `na_rep` is empty.
pub fn resolve_cell_write(
    value: &EnumCellValue,
    write_method: &EnumWriteMethod,
    style: &SpecCellFormat,
    na_rep: &str,
    row: usize,
    col: usize,
) -> DrawResult<EnumCellWrite> {
    let reject = |reason: String| XlsxDrawError::Write { row, col, reason };
    let missing = || {
        if na_rep.is_empty() {
            EnumCellWrite::Blank
        } else {
            EnumCellWrite::String(na_rep.to_string())
        }
    };

    if let EnumWriteMethod::Blank = write_method {
        return Ok(EnumCellWrite::Blank);
    }
    if let EnumWriteMethod::RichString { segments } = write_method {
        if segments.is_empty() {
            return Err(reject("rich string requires at least one segment".to_string()));
        }
        return Ok(EnumCellWrite::RichString(
            segments
                .iter()
                .map(|seg| {
                    let fmt = match &seg.format {
                        Some(patch) => style.merge(patch),
                        None => style.clone(),
                    };
                    (fmt, seg.text.clone())
                })
                .collect(),
        ));
    }
    if value.is_missing() {
        return Ok(missing());
    }

    match (write_method, value) {
        (EnumWriteMethod::Write, EnumCellValue::String(s)) => Ok(EnumCellWrite::String(s.clone())),
        (EnumWriteMethod::Write, EnumCellValue::Number(n)) => Ok(EnumCellWrite::Number(*n)),
        (EnumWriteMethod::Write, EnumCellValue::Boolean(b)) => Ok(EnumCellWrite::Boolean(*b)),

        (EnumWriteMethod::String, _) => Ok(EnumCellWrite::String(value.to_display_text(na_rep))),

        (EnumWriteMethod::Number, EnumCellValue::Number(n)) => Ok(EnumCellWrite::Number(*n)),
        (EnumWriteMethod::Number, EnumCellValue::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(EnumCellWrite::Number(n)),
            _ => Err(reject(format!("{s:?} is not a finite number"))),
        },

        (EnumWriteMethod::Boolean, EnumCellValue::Boolean(b)) => Ok(EnumCellWrite::Boolean(*b)),

        (EnumWriteMethod::Url { text, tip }, EnumCellValue::String(s)) => Ok(EnumCellWrite::Url {
            link: s.clone(),
            text: text.clone(),
            tip: tip.clone(),
        }),

        (EnumWriteMethod::Formula { result }, EnumCellValue::String(s)) => {
            Ok(EnumCellWrite::Formula {
                formula: s.clone(),
                result: result.clone(),
            })
        }

        (method, value) => Err(reject(format!(
            "write method {} does not accept value {value:?}",
            derive_write_method_name(method)
        ))),
    }
}

/// Short name of a write method for messages and logs.
pub fn derive_write_method_name(write_method: &EnumWriteMethod) -> &'static str {
    match write_method {
        EnumWriteMethod::Write => "write",
        EnumWriteMethod::String => "string",
        EnumWriteMethod::Number => "number",
        EnumWriteMethod::Boolean => "boolean",
        EnumWriteMethod::Blank => "blank",
        EnumWriteMethod::Url { .. } => "url",
        EnumWriteMethod::Formula { .. } => "formula",
        EnumWriteMethod::RichString { .. } => "rich_string",
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WidthEstimation

/// Display width units of `s`; non-ASCII characters count 1.6 units.
pub fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

pub(crate) fn cast_row_num(value: usize) -> DrawResult<u32> {
    if value >= N_NROWS_EXCEL_MAX {
        return Err(XlsxDrawError::OutOfGrid { row: value, col: 0 });
    }
    u32::try_from(value).map_err(|_| XlsxDrawError::OutOfGrid { row: value, col: 0 })
}

pub(crate) fn cast_col_num(value: usize) -> DrawResult<u16> {
    if value >= N_NCOLS_EXCEL_MAX {
        return Err(XlsxDrawError::OutOfGrid { row: 0, col: value });
    }
    u16::try_from(value).map_err(|_| XlsxDrawError::OutOfGrid { row: 0, col: value })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
