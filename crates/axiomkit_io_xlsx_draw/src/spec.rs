//! Shared drawing specification models.

use serde::Deserialize;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification (style mapping).
///
/// Every field is optional; `None` means "not set" so formats can be layered
/// with [`SpecCellFormat::merge`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,
    /// Underline style (`0` none, `1` single, `2` double, `33`/`34` accounting).
    pub underline: Option<i64>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Top border override.
    pub top: Option<i64>,
    /// Bottom border override.
    pub bottom: Option<i64>,
    /// Left border override.
    pub left: Option<i64>,
    /// Right border override.
    pub right: Option<i64>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color.
    pub bg_color: Option<String>,
    /// Font color.
    #[serde(alias = "color")]
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            underline: other.underline.or(self.underline),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            text_wrap: other.text_wrap.or(self.text_wrap),
            top: other.top.or(self.top),
            bottom: other.bottom.or(self.bottom),
            left: other.left.or(self.left),
            right: other.right.or(self.right),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }

    /// Format with a single border side set.
    pub fn from_border_side(side: EnumBorderSide, border: i64) -> SpecCellFormat {
        let mut fmt = SpecCellFormat::default();
        match side {
            EnumBorderSide::Top => fmt.top = Some(border),
            EnumBorderSide::Bottom => fmt.bottom = Some(border),
            EnumBorderSide::Left => fmt.left = Some(border),
            EnumBorderSide::Right => fmt.right = Some(border),
        }
        fmt
    }
}

/// One side of a cell border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumBorderSide {
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
    /// Left edge.
    Left,
    /// Right edge.
    Right,
}

/// Style overlay applied at a region boundary (first/last cell, table edge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumBoundaryStyle {
    /// Border style index applied to the side facing outwards.
    Border(i64),
    /// Arbitrary format merged over the cell style.
    Format(SpecCellFormat),
}

impl EnumBoundaryStyle {
    /// Resolve into a format patch for the given outward side.
    pub fn to_format(&self, side: EnumBorderSide) -> SpecCellFormat {
        match self {
            Self::Border(n) => SpecCellFormat::from_border_side(side, *n),
            Self::Format(fmt) => fmt.clone(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValueSpecification

/// Raw cell value carried by an element.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnumCellValue {
    /// Missing/blank value.
    #[default]
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
}

impl EnumCellValue {
    /// Displayed text of the value; missing values map to `na_rep`.
    pub fn to_display_text(&self, na_rep: &str) -> String {
        match self {
            Self::None => na_rep.to_string(),
            Self::String(s) => s.clone(),
            Self::Number(n) if !n.is_finite() => na_rep.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }

    /// Whether the value is missing (`None` or a non-finite number).
    pub fn is_missing(&self) -> bool {
        match self {
            Self::None => true,
            Self::Number(n) => !n.is_finite(),
            _ => false,
        }
    }
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for EnumCellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for EnumCellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for EnumCellValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for EnumCellValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<T: Into<EnumCellValue>> From<Option<T>> for EnumCellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

/// One run of a rich string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecRichSegment {
    /// Run text.
    pub text: String,
    /// Format patch merged over the element style for this run.
    #[serde(default)]
    pub format: Option<SpecCellFormat>,
}

/// Worksheet write operation selected by an element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnumWriteMethod {
    /// Generic write dispatched on the value type.
    #[default]
    Write,
    /// Always write as text.
    String,
    /// Write as number; text values must parse as `f64`.
    Number,
    /// Write as boolean.
    Boolean,
    /// Write a formatted blank regardless of value.
    Blank,
    /// Write the text value as a hyperlink.
    Url {
        /// Display text (defaults to the link).
        #[serde(default)]
        text: Option<String>,
        /// Hover tooltip.
        #[serde(default)]
        tip: Option<String>,
    },
    /// Write the text value as a formula.
    Formula {
        /// Cached result shown before recalculation.
        #[serde(default)]
        result: Option<String>,
    },
    /// Write formatted runs; the element value is ignored.
    RichString {
        /// Runs in display order.
        segments: Vec<SpecRichSegment>,
    },
}

/// Fully resolved cell write handed to a grid surface.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellWrite {
    /// Formatted empty cell.
    Blank,
    /// Text cell.
    String(String),
    /// Numeric cell.
    Number(f64),
    /// Boolean cell.
    Boolean(bool),
    /// Hyperlink cell.
    Url {
        /// Link target.
        link: String,
        /// Display text.
        text: Option<String>,
        /// Hover tooltip.
        tip: Option<String>,
    },
    /// Formula cell.
    Formula {
        /// Formula text.
        formula: String,
        /// Cached result.
        result: Option<String>,
    },
    /// Rich string with resolved per-run formats.
    RichString(Vec<(SpecCellFormat, String)>),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region GeometrySpecification

/// Zero-based grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SpecPosition {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl SpecPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Position shifted by `rows` down and `cols` right, saturating at `usize::MAX`.
    pub fn offset(&self, rows: usize, cols: usize) -> Self {
        Self {
            row: self.row.saturating_add(rows),
            col: self.col.saturating_add(cols),
        }
    }
}

/// Number of grid cells occupied (rows x columns), merges included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpecExtent {
    /// Rows occupied.
    pub height: usize,
    /// Columns occupied.
    pub width: usize,
}

impl Default for SpecExtent {
    fn default() -> Self {
        Self::UNIT
    }
}

impl SpecExtent {
    /// Single cell.
    pub const UNIT: SpecExtent = SpecExtent {
        height: 1,
        width: 1,
    };
    /// Nothing drawn.
    pub const EMPTY: SpecExtent = SpecExtent {
        height: 0,
        width: 0,
    };

    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// `true` when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// `true` when the extent covers more than one cell.
    pub fn is_merged(&self) -> bool {
        self.height > 1 || self.width > 1
    }

    /// Stack `other` below `self`.
    ///
    /// Sums saturate so an oversized extent fails region validation instead
    /// of wrapping.
    pub fn stack_vertical(&self, other: &SpecExtent) -> SpecExtent {
        SpecExtent {
            height: self.height.saturating_add(other.height),
            width: usize::max(self.width, other.width),
        }
    }

    /// Place `other` to the right of `self`.
    pub fn stack_horizontal(&self, other: &SpecExtent) -> SpecExtent {
        SpecExtent {
            height: usize::max(self.height, other.height),
            width: self.width.saturating_add(other.width),
        }
    }
}

/// Layout axis of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumOrientation {
    /// Top to bottom.
    #[default]
    Vertical,
    /// Left to right.
    Horizontal,
}

/// Column width rule applied after an element is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnumColumnWidth {
    /// Total width spread evenly over the covered columns.
    Fixed(f64),
    /// Width from displayed text length plus padding on both sides.
    Auto,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CommentSpecification

/// Options for a cell note.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SpecCommentOptions {
    /// Note author.
    pub author: Option<String>,
    /// Show the note without hovering.
    pub visible: Option<bool>,
    /// Box width in pixels.
    pub width: Option<u32>,
    /// Box height in pixels.
    pub height: Option<u32>,
}

/// Note attached to an element's top-left cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCellComment {
    /// Note text.
    pub text: String,
    /// Note options.
    pub options: SpecCommentOptions,
}

impl SpecCellComment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: SpecCommentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SpecCommentOptions) -> Self {
        self.options = options;
        self
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
