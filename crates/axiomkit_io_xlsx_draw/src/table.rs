//! Column-oriented table drawn as a header row plus one series per column.

use std::collections::BTreeMap;
use std::io::Cursor;

use indexmap::IndexMap;
use log::debug;
use polars::prelude::{AnyValue, DataFrame, IpcReader, SerReader};

use crate::conf::{N_PADDING_AUTOFIT_DEFAULT, N_WIDTH_EXCEL_COLUMN_MAX};
use crate::drawer::{Drawable, Drawer};
use crate::element::Element;
use crate::error::{DrawResult, XlsxDrawError};
use crate::series::Series;
use crate::spec::{
    EnumBorderSide, EnumBoundaryStyle, EnumCellValue, EnumColumnWidth, EnumOrientation,
    EnumWriteMethod, SpecCellComment, SpecCellFormat, SpecExtent, SpecPosition,
};
use crate::surface::GridSurface;
use crate::util::{validate_region, validate_region_allow_empty};

////////////////////////////////////////////////////////////////////////////////
// #region TableSpecification

/// Border overlays on the outer edge of a table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecTableBorders {
    /// First drawn row (header, or first data row without header).
    pub top: Option<EnumBoundaryStyle>,
    /// Last cell of every column.
    pub bottom: Option<EnumBoundaryStyle>,
    /// Every cell of the first column.
    pub left: Option<EnumBoundaryStyle>,
    /// Every cell of the last column.
    pub right: Option<EnumBoundaryStyle>,
}

impl SpecTableBorders {
    /// Same border index on all four sides.
    pub fn all(border: i64) -> Self {
        Self {
            top: Some(EnumBoundaryStyle::Border(border)),
            bottom: Some(EnumBoundaryStyle::Border(border)),
            left: Some(EnumBoundaryStyle::Border(border)),
            right: Some(EnumBoundaryStyle::Border(border)),
        }
    }
}

/// Table-wide layout and style options.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecTableOptions {
    /// Extent of each data cell (columns may override the width).
    pub cell_extent: SpecExtent,
    /// Rows occupied by each header cell.
    pub header_height: usize,
    /// Base style for every cell.
    pub style: SpecCellFormat,
    /// Overlay for header cells.
    pub header_style: SpecCellFormat,
    /// Outer border overlays.
    pub borders: SpecTableBorders,
    /// Write method for data cells unless a column or cell overrides it.
    pub write_method: Option<EnumWriteMethod>,
    /// Draw the header row above the data.
    pub if_draw_header: bool,
    /// Width rule for every column unless overridden.
    pub col_width: Option<EnumColumnWidth>,
    /// Padding on both sides of auto-fitted widths.
    pub padding: f64,
}

impl Default for SpecTableOptions {
    fn default() -> Self {
        Self {
            cell_extent: SpecExtent::UNIT,
            header_height: 1,
            style: SpecCellFormat::default(),
            header_style: SpecCellFormat::default(),
            borders: SpecTableBorders::default(),
            write_method: None,
            if_draw_header: true,
            col_width: None,
            padding: N_PADDING_AUTOFIT_DEFAULT,
        }
    }
}

/// Per-column overrides.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecColumnOverride {
    /// Overlay on the table style for data cells.
    pub style: Option<SpecCellFormat>,
    /// Overlay on the header style.
    pub header_style: Option<SpecCellFormat>,
    /// Write method for data cells of this column.
    pub write_method: Option<EnumWriteMethod>,
    /// Columns spanned by each cell of this column.
    pub cell_width: Option<usize>,
    /// Width rule replacing the table default.
    pub col_width: Option<EnumColumnWidth>,
}

/// Per-cell overrides keyed by `(column, row)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecCellOverride {
    /// Overlay on the column style.
    pub style: Option<SpecCellFormat>,
    /// Write method for this cell only.
    pub write_method: Option<EnumWriteMethod>,
    /// Note on this cell.
    pub comment: Option<SpecCellComment>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Table

/// Ordered named columns with lazily derived series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    dict_columns: IndexMap<String, Vec<EnumCellValue>>,
    options: SpecTableOptions,
    dict_col_overrides: IndexMap<String, SpecColumnOverride>,
    dict_cell_overrides: BTreeMap<(String, usize), SpecCellOverride>,
}

impl Table {
    pub fn new(options: SpecTableOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Build from `(name, values)` pairs in order.
    pub fn from_columns<I, S, V>(columns: I, options: SpecTableOptions) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: IntoIterator,
        V::Item: Into<EnumCellValue>,
    {
        let mut table = Self::new(options);
        for (name, values) in columns {
            table.set_column(name, values.into_iter().map(Into::into).collect());
        }
        table
    }

    /// Build from a DataFrame, one column per frame column.
    pub fn from_dataframe(df: &DataFrame, options: SpecTableOptions) -> DrawResult<Self> {
        let mut table = Self::new(options);
        let n_height = df.height();
        for column in df.get_columns() {
            let l_values = (0..n_height)
                .map(|n_row| column.get(n_row).map(derive_cell_value_from_any_value))
                .collect::<Result<Vec<_>, _>>()?;
            table.set_column(column.name().to_string(), l_values);
        }
        debug!(
            n_rows = n_height,
            n_cols = table.n_cols();
            "Built table from DataFrame"
        );
        Ok(table)
    }

    /// Build from Polars IPC bytes.
    pub fn from_ipc_bytes(v_ipc_df: &[u8], options: SpecTableOptions) -> DrawResult<Self> {
        let df = IpcReader::new(Cursor::new(v_ipc_df)).finish()?;
        Self::from_dataframe(&df, options)
    }

    pub fn options(&self) -> &SpecTableOptions {
        &self.options
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.dict_columns.keys().map(String::as_str).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[EnumCellValue]> {
        self.dict_columns.get(name).map(Vec::as_slice)
    }

    /// Mutable access to a column's values.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Vec<EnumCellValue>> {
        self.dict_columns.get_mut(name)
    }

    pub fn n_cols(&self) -> usize {
        self.dict_columns.len()
    }

    /// Length of the longest column.
    pub fn n_rows(&self) -> usize {
        self.dict_columns.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Insert or replace a column; a new name is appended at the right.
    pub fn set_column(&mut self, name: impl Into<String>, values: Vec<EnumCellValue>) {
        self.dict_columns.insert(name.into(), values);
    }

    pub fn set_cell(
        &mut self,
        column: &str,
        row: usize,
        value: impl Into<EnumCellValue>,
    ) -> DrawResult<()> {
        self.validate_cell(column, row)?;
        if let Some(l_values) = self.dict_columns.get_mut(column) {
            l_values[row] = value.into();
        }
        Ok(())
    }

    pub fn set_cell_write_method(
        &mut self,
        column: &str,
        row: usize,
        write_method: EnumWriteMethod,
    ) -> DrawResult<()> {
        self.validate_cell(column, row)?;
        self.derive_cell_override_mut(column, row).write_method = Some(write_method);
        Ok(())
    }

    /// Overlay `style` on one cell, on top of any earlier cell overlay.
    pub fn set_cell_style(
        &mut self,
        column: &str,
        row: usize,
        style: SpecCellFormat,
    ) -> DrawResult<()> {
        self.validate_cell(column, row)?;
        let cell = self.derive_cell_override_mut(column, row);
        cell.style = Some(match &cell.style {
            Some(prev) => prev.merge(&style),
            None => style,
        });
        Ok(())
    }

    pub fn set_cell_comment(
        &mut self,
        column: &str,
        row: usize,
        comment: SpecCellComment,
    ) -> DrawResult<()> {
        self.validate_cell(column, row)?;
        self.derive_cell_override_mut(column, row).comment = Some(comment);
        Ok(())
    }

    pub fn set_column_override(
        &mut self,
        column: &str,
        col_override: SpecColumnOverride,
    ) -> DrawResult<()> {
        if !self.dict_columns.contains_key(column) {
            return Err(XlsxDrawError::ColumnNotFound(column.to_string()));
        }
        self.dict_col_overrides
            .insert(column.to_string(), col_override);
        Ok(())
    }

    fn validate_cell(&self, column: &str, row: usize) -> DrawResult<()> {
        let l_values = self
            .dict_columns
            .get(column)
            .ok_or_else(|| XlsxDrawError::ColumnNotFound(column.to_string()))?;
        if row >= l_values.len() {
            return Err(XlsxDrawError::RowOutOfRange {
                column: column.to_string(),
                row,
                len: l_values.len(),
            });
        }
        Ok(())
    }

    fn derive_cell_override_mut(&mut self, column: &str, row: usize) -> &mut SpecCellOverride {
        self.dict_cell_overrides
            .entry((column.to_string(), row))
            .or_default()
    }

    fn derive_cell_width(&self, column: &str) -> usize {
        self.dict_col_overrides
            .get(column)
            .and_then(|ov| ov.cell_width)
            .unwrap_or(self.options.cell_extent.width)
    }

    fn derive_header_height(&self) -> usize {
        if self.options.if_draw_header {
            self.options.header_height
        } else {
            0
        }
    }

    ////////////////////////////////////////////////////////////////////////////
    // #region SeriesDerivation

    /// Header row as a horizontal series (empty when headers are off).
    pub fn derive_header_series(&self) -> Series {
        if !self.options.if_draw_header {
            return Series::from_elements(Vec::new(), EnumOrientation::Horizontal);
        }
        let cfg_borders = &self.options.borders;
        let l_elements = self
            .dict_columns
            .keys()
            .map(|name| {
                let col_override = self.dict_col_overrides.get(name);
                let mut style = self.options.style.merge(&self.options.header_style);
                if let Some(fmt) = col_override.and_then(|ov| ov.header_style.as_ref()) {
                    style = style.merge(fmt);
                }
                Element::new(name.as_str())
                    .with_extent(SpecExtent::new(
                        self.options.header_height,
                        self.derive_cell_width(name),
                    ))
                    .with_style(style)
            })
            .collect();

        let mut series = Series::from_elements(l_elements, EnumOrientation::Horizontal)
            .with_boundaries(cfg_borders.left.as_ref(), cfg_borders.right.as_ref());
        if let Some(top) = &cfg_borders.top {
            series = series.with_style_patch(&top.to_format(EnumBorderSide::Top));
        }
        if self.n_rows() == 0
            && let Some(bottom) = &cfg_borders.bottom
        {
            series = series.with_style_patch(&bottom.to_format(EnumBorderSide::Bottom));
        }
        series
    }

    /// Data cells of the column at `idx` as a vertical series.
    pub fn derive_column_series(&self, idx: usize) -> DrawResult<Series> {
        let (name, l_values) = self
            .dict_columns
            .get_index(idx)
            .ok_or_else(|| XlsxDrawError::ColumnNotFound(format!("#{idx}")))?;
        let col_override = self.dict_col_overrides.get(name);
        let cfg_borders = &self.options.borders;

        let style_col = match col_override.and_then(|ov| ov.style.as_ref()) {
            Some(fmt) => self.options.style.merge(fmt),
            None => self.options.style.clone(),
        };
        let write_method_col = col_override
            .and_then(|ov| ov.write_method.clone())
            .or_else(|| self.options.write_method.clone())
            .unwrap_or_default();
        let extent_cell = SpecExtent::new(
            self.options.cell_extent.height,
            self.derive_cell_width(name),
        );

        let l_elements = l_values
            .iter()
            .enumerate()
            .map(|(n_row, value)| {
                let cell = self.dict_cell_overrides.get(&(name.clone(), n_row));
                let mut elem = Element::new(value.clone())
                    .with_extent(extent_cell)
                    .with_style(style_col.clone())
                    .with_write_method(write_method_col.clone());
                if let Some(cell) = cell {
                    if let Some(fmt) = &cell.style {
                        elem = elem.with_style_patch(fmt);
                    }
                    if let Some(method) = &cell.write_method {
                        elem = elem.with_write_method(method.clone());
                    }
                    if let Some(comment) = &cell.comment {
                        elem = elem.with_comment(comment.clone());
                    }
                }
                elem
            })
            .collect();

        let top = if self.options.if_draw_header {
            None
        } else {
            cfg_borders.top.as_ref()
        };
        let mut series = Series::from_elements(l_elements, EnumOrientation::Vertical)
            .with_boundaries(top, cfg_borders.bottom.as_ref());
        if idx == 0
            && let Some(left) = &cfg_borders.left
        {
            series = series.with_style_patch(&left.to_format(EnumBorderSide::Left));
        }
        if idx + 1 == self.n_cols()
            && let Some(right) = &cfg_borders.right
        {
            series = series.with_style_patch(&right.to_format(EnumBorderSide::Right));
        }
        Ok(series)
    }

    // #endregion
    ////////////////////////////////////////////////////////////////////////////

    fn apply_column_widths(
        &self,
        surface: &mut dyn GridSurface,
        anchor: SpecPosition,
        header: &Series,
        na_rep: &str,
    ) -> DrawResult<()> {
        let mut n_col = anchor.col;
        for (idx, name) in self.dict_columns.keys().enumerate() {
            let n_cell_width = self.derive_cell_width(name);
            let col_width = self
                .dict_col_overrides
                .get(name)
                .and_then(|ov| ov.col_width)
                .or(self.options.col_width);

            let n_total = match col_width {
                None => None,
                Some(EnumColumnWidth::Fixed(n_width)) => Some(n_width),
                Some(EnumColumnWidth::Auto) => {
                    let series = self.derive_column_series(idx)?;
                    header
                        .elements()
                        .get(idx)
                        .into_iter()
                        .chain(series.elements())
                        .filter_map(|elem| {
                            elem.clone()
                                .with_padding(self.options.padding)
                                .calculate_autofit_width(na_rep)
                        })
                        .reduce(f64::max)
                }
            };
            if let Some(n_total) = n_total {
                let n_width = (n_total / n_cell_width as f64).min(N_WIDTH_EXCEL_COLUMN_MAX);
                for n_col_cell in n_col..n_col + n_cell_width {
                    surface.set_column_width(n_col_cell, n_width)?;
                }
            }
            n_col += n_cell_width;
        }
        Ok(())
    }
}

impl Drawable for Table {
    fn extent(&self) -> SpecExtent {
        let n_width = self
            .dict_columns
            .keys()
            .map(|name| self.derive_cell_width(name))
            .fold(0usize, usize::saturating_add);
        let n_height = self.derive_header_height().saturating_add(
            self.n_rows()
                .saturating_mul(self.options.cell_extent.height),
        );
        if n_width == 0 || n_height == 0 {
            return SpecExtent::EMPTY;
        }
        SpecExtent::new(n_height, n_width)
    }

    fn validate(&self, anchor: SpecPosition) -> DrawResult<()> {
        let extent = self.extent();
        validate_region_allow_empty(anchor, extent)?;
        if extent.is_empty() {
            return Ok(());
        }
        for name in self.dict_columns.keys() {
            let n_cell_width = self.derive_cell_width(name);
            if self.options.if_draw_header {
                validate_region(
                    anchor,
                    SpecExtent::new(self.options.header_height, n_cell_width),
                )?;
            }
            if self.n_rows() > 0 {
                validate_region(
                    anchor,
                    SpecExtent::new(self.options.cell_extent.height, n_cell_width),
                )?;
            }
        }
        Ok(())
    }

    fn render(
        &self,
        surface: &mut dyn GridSurface,
        anchor: SpecPosition,
        na_rep: &str,
    ) -> DrawResult<()> {
        debug!(
            row = anchor.row,
            col = anchor.col,
            n_rows = self.n_rows(),
            n_cols = self.n_cols();
            "Laying out table"
        );
        let header = self.derive_header_series();
        {
            let mut drawer = Drawer::at(&mut *surface, anchor)?.with_na_rep(na_rep);
            drawer.draw(&header)?;

            let n_row_data = anchor.row + self.derive_header_height();
            let mut n_col = anchor.col;
            for (idx, name) in self.dict_columns.keys().enumerate() {
                let series = self.derive_column_series(idx)?;
                if !series.is_empty() {
                    drawer.reset(Some(n_row_data), Some(n_col))?;
                    drawer.draw(&series)?;
                }
                n_col += self.derive_cell_width(name);
            }
        }
        self.apply_column_widths(surface, anchor, &header, na_rep)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) => EnumCellValue::String(val.to_string()),
        AnyValue::StringOwned(val) => EnumCellValue::String(val.to_string()),
        AnyValue::Boolean(val) => EnumCellValue::Boolean(val),
        AnyValue::UInt8(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt16(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt32(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int8(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int16(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int128(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float64(val) => EnumCellValue::Number(val),
        _ => EnumCellValue::String(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, IpcWriter, NamedFrom, SerWriter};

    use super::*;
    use crate::spec::EnumCellWrite;
    use crate::surface::SheetRecorder;

    fn create_sample_table(options: SpecTableOptions) -> Table {
        Table::from_columns([("A", vec![1, 2]), ("B", vec![3, 4])], options)
    }

    #[test]
    fn test_table_layout_and_extent() {
        let table = create_sample_table(SpecTableOptions::default());
        assert_eq!(table.extent(), SpecExtent::new(3, 2));

        let mut recorder = SheetRecorder::new();
        let mut drawer = Drawer::at(&mut recorder, SpecPosition::new(5, 3)).unwrap();
        let extent = drawer.draw(&table).unwrap();
        assert_eq!(extent, SpecExtent::new(3, 2));
        assert_eq!(drawer.position(), SpecPosition::new(5, 3));

        let expect = [
            ((5, 3), EnumCellWrite::String("A".to_string())),
            ((5, 4), EnumCellWrite::String("B".to_string())),
            ((6, 3), EnumCellWrite::Number(1.0)),
            ((7, 3), EnumCellWrite::Number(2.0)),
            ((6, 4), EnumCellWrite::Number(3.0)),
            ((7, 4), EnumCellWrite::Number(4.0)),
        ];
        for ((row, col), write) in expect {
            assert_eq!(recorder.cell(row, col).unwrap().0, &write, "({row}, {col})");
        }
        assert_eq!(recorder.writes().len(), 6);
    }

    #[test]
    fn test_table_borders_hit_outer_edges() {
        let options = SpecTableOptions {
            borders: SpecTableBorders::all(2),
            ..Default::default()
        };
        let mut recorder = SheetRecorder::new();
        Drawer::new(&mut recorder)
            .draw(&create_sample_table(options))
            .unwrap();

        let (_, fmt_header_a) = recorder.cell(0, 0).unwrap();
        assert_eq!((fmt_header_a.top, fmt_header_a.left), (Some(2), Some(2)));
        assert_eq!(fmt_header_a.right, None);

        let (_, fmt_a1) = recorder.cell(1, 0).unwrap();
        assert_eq!((fmt_a1.top, fmt_a1.bottom, fmt_a1.left), (None, None, Some(2)));

        let (_, fmt_b2) = recorder.cell(2, 1).unwrap();
        assert_eq!((fmt_b2.bottom, fmt_b2.right, fmt_b2.left), (Some(2), Some(2), None));
    }

    #[test]
    fn test_without_header_top_border_goes_to_first_row() {
        let options = SpecTableOptions {
            if_draw_header: false,
            borders: SpecTableBorders {
                top: Some(EnumBoundaryStyle::Border(1)),
                ..Default::default()
            },
            ..Default::default()
        };
        let table = create_sample_table(options);
        assert_eq!(table.extent(), SpecExtent::new(2, 2));

        let mut recorder = SheetRecorder::new();
        Drawer::new(&mut recorder).draw(&table).unwrap();
        assert_eq!(recorder.cell(0, 0).unwrap().0, &EnumCellWrite::Number(1.0));
        assert_eq!(recorder.cell(0, 1).unwrap().1.top, Some(1));
        assert_eq!(recorder.cell(1, 1).unwrap().1.top, None);
    }

    #[test]
    fn test_overrides_are_applied_at_draw_time() {
        let mut table = create_sample_table(SpecTableOptions {
            write_method: Some(EnumWriteMethod::String),
            ..Default::default()
        });
        table.set_cell("A", 1, "changed").unwrap();
        table
            .set_cell_write_method("B", 0, EnumWriteMethod::Number)
            .unwrap();
        table
            .set_cell_style(
                "B",
                1,
                SpecCellFormat {
                    italic: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        table
            .set_column_override(
                "B",
                SpecColumnOverride {
                    cell_width: Some(2),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(table.extent(), SpecExtent::new(3, 3));

        let mut recorder = SheetRecorder::new();
        Drawer::new(&mut recorder).draw(&table).unwrap();
        assert_eq!(
            recorder.cell(2, 0).unwrap().0,
            &EnumCellWrite::String("changed".to_string())
        );
        assert_eq!(
            recorder.cell(1, 0).unwrap().0,
            &EnumCellWrite::String("1".to_string())
        );
        assert_eq!(recorder.cell(1, 1).unwrap().0, &EnumCellWrite::Number(3.0));
        assert_eq!(recorder.cell(2, 1).unwrap().1.italic, Some(true));
        assert_eq!(recorder.merges().len(), 3);
    }

    #[test]
    fn test_cell_mutation_errors() {
        let mut table = create_sample_table(SpecTableOptions::default());
        assert!(matches!(
            table.set_cell("Z", 0, 1),
            Err(XlsxDrawError::ColumnNotFound(_))
        ));
        assert!(matches!(
            table.set_cell("A", 9, 1),
            Err(XlsxDrawError::RowOutOfRange { row: 9, len: 2, .. })
        ));
        assert!(table
            .set_column_override("Z", SpecColumnOverride::default())
            .is_err());

        table.column_mut("A").unwrap().push(EnumCellValue::from(5));
        assert_eq!(table.n_rows(), 3);
    }

    #[test]
    fn test_empty_table_draws_nothing() {
        let table = Table::new(SpecTableOptions::default());
        let mut recorder = SheetRecorder::new();
        let mut drawer = Drawer::new(&mut recorder);
        assert_eq!(drawer.draw(&table).unwrap(), SpecExtent::EMPTY);
        assert_eq!(drawer.extent_last(), SpecExtent::UNIT);
        assert!(recorder.ops().is_empty());
    }

    #[test]
    fn test_table_past_grid_edge_or_with_bad_column_writes_nothing() {
        use crate::conf::N_NROWS_EXCEL_MAX;

        let table = create_sample_table(SpecTableOptions::default());
        let mut recorder = SheetRecorder::new();
        let err = Drawer::at(&mut recorder, SpecPosition::new(N_NROWS_EXCEL_MAX - 2, 0))
            .unwrap()
            .draw(&table)
            .unwrap_err();
        assert!(matches!(err, XlsxDrawError::InvalidExtent { .. }));
        assert!(recorder.ops().is_empty());

        let mut table = create_sample_table(SpecTableOptions::default());
        table
            .set_column_override(
                "B",
                SpecColumnOverride {
                    cell_width: Some(0),
                    ..Default::default()
                },
            )
            .unwrap();
        let mut recorder = SheetRecorder::new();
        let err = Drawer::new(&mut recorder).draw(&table).unwrap_err();
        assert!(matches!(err, XlsxDrawError::InvalidExtent { width: 0, .. }));
        assert!(recorder.ops().is_empty());

        let mut table = create_sample_table(SpecTableOptions::default());
        table
            .set_column_override(
                "A",
                SpecColumnOverride {
                    cell_width: Some(usize::MAX),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(table.extent().width, usize::MAX);
        let mut recorder = SheetRecorder::new();
        assert!(Drawer::new(&mut recorder).draw(&table).is_err());
        assert!(recorder.ops().is_empty());
    }

    #[test]
    fn test_auto_width_includes_header() {
        let table = Table::from_columns(
            [("long header", vec!["x"])],
            SpecTableOptions {
                col_width: Some(EnumColumnWidth::Auto),
                padding: 0.0,
                ..Default::default()
            },
        );
        let mut recorder = SheetRecorder::new();
        Drawer::new(&mut recorder).draw(&table).unwrap();
        assert_eq!(recorder.column_width(0), Some(11.0));
    }

    #[test]
    fn test_from_dataframe_and_ipc_bytes() {
        let mut df = DataFrame::new(vec![
            Column::new("name".into(), &["a", "b"]),
            Column::new("score".into(), &[1.5f64, 2.5]),
            Column::new("ok".into(), &[true, false]),
        ])
        .expect("build frame");

        let table = Table::from_dataframe(&df, SpecTableOptions::default()).expect("from frame");
        assert_eq!(table.column_names(), vec!["name", "score", "ok"]);
        assert_eq!(
            table.column("ok").unwrap(),
            &[EnumCellValue::Boolean(true), EnumCellValue::Boolean(false)]
        );

        let mut v_ipc = Vec::new();
        IpcWriter::new(&mut v_ipc).finish(&mut df).expect("write ipc");
        let table_ipc = Table::from_ipc_bytes(&v_ipc, SpecTableOptions::default()).expect("from ipc");
        assert_eq!(table_ipc, table);
    }
}
