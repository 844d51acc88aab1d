//! Grid surfaces: the write target behind a [`crate::Drawer`].
//!
//! - [`GridSurface`] : minimal write/merge/width/comment contract
//! - `Worksheet`     : `rust_xlsxwriter` backend, formats compiled per write
//! - [`SheetRecorder`] : in-memory surface recording every operation

use log::trace;
use rust_xlsxwriter::{
    Format, FormatAlign, FormatBorder, FormatUnderline, Formula, Note, Url, Worksheet,
};

use crate::error::DrawResult;
use crate::spec::{EnumCellWrite, SpecCellComment, SpecCellFormat, SpecPosition};
use crate::util::{cast_col_num, cast_row_num};

/// Write target for drawn elements.
///
/// Implementations are not expected to be transactional: a failing call may
/// leave earlier writes in place.
pub trait GridSurface {
    /// Write one resolved value at `(row, col)`.
    fn write_cell(
        &mut self,
        row: usize,
        col: usize,
        write: &EnumCellWrite,
        format: &SpecCellFormat,
    ) -> DrawResult<()>;

    /// Merge the inclusive range and apply `format` to it.
    fn merge_range(
        &mut self,
        row_first: usize,
        col_first: usize,
        row_last: usize,
        col_last: usize,
        format: &SpecCellFormat,
    ) -> DrawResult<()>;

    /// Set one column width in character units.
    fn set_column_width(&mut self, col: usize, width: f64) -> DrawResult<()>;

    /// Set one row height in points.
    fn set_row_height(&mut self, row: usize, height: f64) -> DrawResult<()>;

    /// Attach a note to `(row, col)`.
    fn add_comment(&mut self, row: usize, col: usize, comment: &SpecCellComment)
    -> DrawResult<()>;
}

////////////////////////////////////////////////////////////////////////////////
// #region WorksheetSurface

impl GridSurface for Worksheet {
    fn write_cell(
        &mut self,
        row: usize,
        col: usize,
        write: &EnumCellWrite,
        format: &SpecCellFormat,
    ) -> DrawResult<()> {
        let n_row = cast_row_num(row)?;
        let n_col = cast_col_num(col)?;
        let fmt = derive_rust_xlsx_format(format);

        match write {
            EnumCellWrite::Blank => {
                self.write_blank(n_row, n_col, &fmt)?;
            }
            EnumCellWrite::String(val) => {
                self.write_string_with_format(n_row, n_col, val, &fmt)?;
            }
            EnumCellWrite::Number(val) => {
                self.write_number_with_format(n_row, n_col, *val, &fmt)?;
            }
            EnumCellWrite::Boolean(val) => {
                self.write_boolean_with_format(n_row, n_col, *val, &fmt)?;
            }
            EnumCellWrite::Url { link, text, tip } => {
                let mut url = Url::new(link.as_str());
                if let Some(val) = text {
                    url = url.set_text(val.as_str());
                }
                if let Some(val) = tip {
                    url = url.set_tip(val.as_str());
                }
                self.write_url_with_format(n_row, n_col, url, &fmt)?;
            }
            EnumCellWrite::Formula { formula, result } => {
                let mut cfg_formula = Formula::new(formula);
                if let Some(val) = result {
                    cfg_formula = cfg_formula.set_result(val.as_str());
                }
                self.write_formula_with_format(n_row, n_col, cfg_formula, &fmt)?;
            }
            EnumCellWrite::RichString(runs) => {
                let l_fmts: Vec<Format> = runs
                    .iter()
                    .map(|(fmt_run, _)| derive_rust_xlsx_format(fmt_run))
                    .collect();
                let l_runs: Vec<(&Format, &str)> = l_fmts
                    .iter()
                    .zip(runs.iter())
                    .map(|(fmt_run, (_, text))| (fmt_run, text.as_str()))
                    .collect();
                self.write_rich_string_with_format(n_row, n_col, &l_runs, &fmt)?;
            }
        }
        Ok(())
    }

    fn merge_range(
        &mut self,
        row_first: usize,
        col_first: usize,
        row_last: usize,
        col_last: usize,
        format: &SpecCellFormat,
    ) -> DrawResult<()> {
        Worksheet::merge_range(
            self,
            cast_row_num(row_first)?,
            cast_col_num(col_first)?,
            cast_row_num(row_last)?,
            cast_col_num(col_last)?,
            "",
            &derive_rust_xlsx_format(format),
        )?;
        Ok(())
    }

    fn set_column_width(&mut self, col: usize, width: f64) -> DrawResult<()> {
        Worksheet::set_column_width(self, cast_col_num(col)?, width)?;
        Ok(())
    }

    fn set_row_height(&mut self, row: usize, height: f64) -> DrawResult<()> {
        Worksheet::set_row_height(self, cast_row_num(row)?, height)?;
        Ok(())
    }

    fn add_comment(
        &mut self,
        row: usize,
        col: usize,
        comment: &SpecCellComment,
    ) -> DrawResult<()> {
        let mut note = Note::new(comment.text.as_str());
        if let Some(val) = &comment.options.author {
            note = note.set_author(val.as_str());
        }
        if let Some(val) = comment.options.visible {
            note = note.set_visible(val);
        }
        if let Some(val) = comment.options.width {
            note = note.set_width(val);
        }
        if let Some(val) = comment.options.height {
            note = note.set_height(val);
        }
        self.insert_note(cast_row_num(row)?, cast_col_num(col)?, &note)?;
        Ok(())
    }
}

/// Compile a style mapping into a `rust_xlsxwriter` format.
pub fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }
    if let Some(val) = spec.underline {
        format = format.set_underline(derive_format_underline(val));
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }

    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if let Some(val) = spec.top {
        format = format.set_border_top(derive_format_border(val));
    }
    if let Some(val) = spec.bottom {
        format = format.set_border_bottom(derive_format_border(val));
    }
    if let Some(val) = spec.left {
        format = format.set_border_left(derive_format_border(val));
    }
    if let Some(val) = spec.right {
        format = format.set_border_right(derive_format_border(val));
    }

    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        0 => FormatBorder::None,
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        8 => FormatBorder::MediumDashed,
        9 => FormatBorder::DashDot,
        10 => FormatBorder::MediumDashDot,
        11 => FormatBorder::DashDotDot,
        12 => FormatBorder::MediumDashDotDot,
        13 => FormatBorder::SlantDashDot,
        _ => FormatBorder::None,
    }
}

fn derive_format_underline(underline: i64) -> FormatUnderline {
    match underline {
        1 => FormatUnderline::Single,
        2 => FormatUnderline::Double,
        33 => FormatUnderline::SingleAccounting,
        34 => FormatUnderline::DoubleAccounting,
        _ => FormatUnderline::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "fill" => Some(FormatAlign::Fill),
        "justify" => Some(FormatAlign::Justify),
        "center_across" => Some(FormatAlign::CenterAcross),
        "distributed" => Some(FormatAlign::Distributed),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        "vjustify" | "vertical_justify" => Some(FormatAlign::VerticalJustify),
        "vdistributed" | "vertical_distributed" => Some(FormatAlign::VerticalDistributed),
        _ => None,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RecordingSurface

/// One operation captured by [`SheetRecorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum EnumSurfaceOp {
    /// Cell write.
    Write {
        /// Target cell.
        position: SpecPosition,
        /// Resolved write.
        write: EnumCellWrite,
        /// Applied style.
        format: SpecCellFormat,
    },
    /// Range merge.
    Merge {
        /// Top-left cell.
        first: SpecPosition,
        /// Bottom-right cell.
        last: SpecPosition,
        /// Applied style.
        format: SpecCellFormat,
    },
    /// Column width change.
    ColumnWidth {
        /// Column index.
        col: usize,
        /// Width in character units.
        width: f64,
    },
    /// Row height change.
    RowHeight {
        /// Row index.
        row: usize,
        /// Height in points.
        height: f64,
    },
    /// Note attachment.
    Comment {
        /// Target cell.
        position: SpecPosition,
        /// Attached note.
        comment: SpecCellComment,
    },
}

/// In-memory grid surface that records operations in call order.
///
/// Applies the same grid bounds as the worksheet backend.
#[derive(Debug, Clone, Default)]
pub struct SheetRecorder {
    l_ops: Vec<EnumSurfaceOp>,
}

impl SheetRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded operations.
    pub fn ops(&self) -> &[EnumSurfaceOp] {
        &self.l_ops
    }

    /// Cell writes as `(position, write, format)` triples in call order.
    pub fn writes(&self) -> Vec<(SpecPosition, &EnumCellWrite, &SpecCellFormat)> {
        self.l_ops
            .iter()
            .filter_map(|op| match op {
                EnumSurfaceOp::Write {
                    position,
                    write,
                    format,
                } => Some((*position, write, format)),
                _ => None,
            })
            .collect()
    }

    /// Latest write at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<(&EnumCellWrite, &SpecCellFormat)> {
        let target = SpecPosition::new(row, col);
        self.writes()
            .into_iter()
            .rev()
            .find(|(position, _, _)| *position == target)
            .map(|(_, write, format)| (write, format))
    }

    /// Recorded merges as inclusive `(first, last)` corners.
    pub fn merges(&self) -> Vec<(SpecPosition, SpecPosition)> {
        self.l_ops
            .iter()
            .filter_map(|op| match op {
                EnumSurfaceOp::Merge { first, last, .. } => Some((*first, *last)),
                _ => None,
            })
            .collect()
    }

    /// Latest width recorded for `col`.
    pub fn column_width(&self, col: usize) -> Option<f64> {
        self.l_ops.iter().rev().find_map(|op| match op {
            EnumSurfaceOp::ColumnWidth { col: c, width } if *c == col => Some(*width),
            _ => None,
        })
    }

    /// Drop all recorded operations.
    pub fn clear(&mut self) {
        self.l_ops.clear();
    }
}

impl GridSurface for SheetRecorder {
    fn write_cell(
        &mut self,
        row: usize,
        col: usize,
        write: &EnumCellWrite,
        format: &SpecCellFormat,
    ) -> DrawResult<()> {
        cast_row_num(row)?;
        cast_col_num(col)?;
        trace!(row = row, col = col; "Recording cell write");
        self.l_ops.push(EnumSurfaceOp::Write {
            position: SpecPosition::new(row, col),
            write: write.clone(),
            format: format.clone(),
        });
        Ok(())
    }

    fn merge_range(
        &mut self,
        row_first: usize,
        col_first: usize,
        row_last: usize,
        col_last: usize,
        format: &SpecCellFormat,
    ) -> DrawResult<()> {
        cast_row_num(row_last)?;
        cast_col_num(col_last)?;
        self.l_ops.push(EnumSurfaceOp::Merge {
            first: SpecPosition::new(row_first, col_first),
            last: SpecPosition::new(row_last, col_last),
            format: format.clone(),
        });
        Ok(())
    }

    fn set_column_width(&mut self, col: usize, width: f64) -> DrawResult<()> {
        cast_col_num(col)?;
        self.l_ops.push(EnumSurfaceOp::ColumnWidth { col, width });
        Ok(())
    }

    fn set_row_height(&mut self, row: usize, height: f64) -> DrawResult<()> {
        cast_row_num(row)?;
        self.l_ops.push(EnumSurfaceOp::RowHeight { row, height });
        Ok(())
    }

    fn add_comment(
        &mut self,
        row: usize,
        col: usize,
        comment: &SpecCellComment,
    ) -> DrawResult<()> {
        cast_row_num(row)?;
        cast_col_num(col)?;
        self.l_ops.push(EnumSurfaceOp::Comment {
            position: SpecPosition::new(row, col),
            comment: comment.clone(),
        });
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
