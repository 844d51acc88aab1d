//! Plotter-like drawing cursor.
//!
//! A [`Drawer`] sits at one grid position, draws whatever it is fed there,
//! and moves by the footprint of the most recently drawn item.

use indexmap::IndexMap;
use log::{debug, trace};

use crate::error::{DrawResult, XlsxDrawError};
use crate::spec::{SpecExtent, SpecPosition};
use crate::surface::GridSurface;
use crate::util::{
    derive_a1_cell, derive_column_letters, parse_a1_cell, validate_position,
    validate_region_allow_empty,
};

/// Anything a [`Drawer`] can place on a grid surface.
pub trait Drawable {
    /// Aggregate footprint. Empty composites report [`SpecExtent::EMPTY`].
    fn extent(&self) -> SpecExtent;

    /// Check the item can be drawn at `anchor`. Runs before any write.
    fn validate(&self, anchor: SpecPosition) -> DrawResult<()> {
        validate_region_allow_empty(anchor, self.extent())
    }

    /// Write the item with its top-left corner at `anchor`.
    fn render(
        &self,
        surface: &mut dyn GridSurface,
        anchor: SpecPosition,
        na_rep: &str,
    ) -> DrawResult<()>;
}

/// Stateful cursor bound to one grid surface.
pub struct Drawer<'a> {
    surface: &'a mut dyn GridSurface,
    position: SpecPosition,
    extent_last: SpecExtent,
    na_rep: String,
    dict_checkpoints: IndexMap<String, SpecPosition>,
    l_positions_prev: Vec<SpecPosition>,
}

impl<'a> Drawer<'a> {
    /// Create a drawer at `A1`.
    pub fn new(surface: &'a mut dyn GridSurface) -> Self {
        Self {
            surface,
            position: SpecPosition::default(),
            extent_last: SpecExtent::UNIT,
            na_rep: String::new(),
            dict_checkpoints: IndexMap::new(),
            l_positions_prev: Vec::new(),
        }
    }

    /// Create a drawer at `anchor`.
    pub fn at(surface: &'a mut dyn GridSurface, anchor: SpecPosition) -> DrawResult<Self> {
        validate_position(anchor.row, anchor.col)?;
        let mut drawer = Self::new(surface);
        drawer.position = anchor;
        Ok(drawer)
    }

    /// Set the text written for missing values (default: blank cell).
    pub fn with_na_rep(mut self, na_rep: impl Into<String>) -> Self {
        self.na_rep = na_rep.into();
        self
    }

    pub fn position(&self) -> SpecPosition {
        self.position
    }

    pub fn row(&self) -> usize {
        self.position.row
    }

    pub fn col(&self) -> usize {
        self.position.col
    }

    /// Extent of the most recently drawn non-empty item (initially 1x1).
    pub fn extent_last(&self) -> SpecExtent {
        self.extent_last
    }

    pub fn na_rep(&self) -> &str {
        &self.na_rep
    }

    /// Positions left behind by moves and resets, oldest first.
    pub fn history(&self) -> &[SpecPosition] {
        &self.l_positions_prev
    }

    ////////////////////////////////////////////////////////////////////////////
    // #region Drawing

    /// Draw `item` at the current position and remember its extent.
    ///
    /// The position does not change. Empty composites write nothing and keep
    /// the previous extent.
    pub fn draw<D: Drawable + ?Sized>(&mut self, item: &D) -> DrawResult<SpecExtent> {
        let extent = item.extent();
        item.validate(self.position)?;
        if extent.is_empty() {
            trace!(row = self.position.row, col = self.position.col; "Skipping empty item");
            return Ok(extent);
        }

        trace!(
            row = self.position.row,
            col = self.position.col,
            height = extent.height,
            width = extent.width;
            "Drawing item"
        );
        item.render(&mut *self.surface, self.position, &self.na_rep)?;
        self.extent_last = extent;
        Ok(extent)
    }

    // #endregion
    ////////////////////////////////////////////////////////////////////////////
    // #region Movement

    /// Move down by `n` times the height of the last drawn item.
    pub fn move_vertical(&mut self, n: usize) -> DrawResult<()> {
        let n_row = n
            .checked_mul(self.extent_last.height)
            .and_then(|n_step| self.position.row.checked_add(n_step))
            .ok_or(XlsxDrawError::OutOfGrid {
                row: usize::MAX,
                col: self.position.col,
            })?;
        self.set_position(SpecPosition::new(n_row, self.position.col))
    }

    /// Move right by `n` times the width of the last drawn item.
    pub fn move_horizontal(&mut self, n: usize) -> DrawResult<()> {
        let n_col = n
            .checked_mul(self.extent_last.width)
            .and_then(|n_step| self.position.col.checked_add(n_step))
            .ok_or(XlsxDrawError::OutOfGrid {
                row: self.position.row,
                col: usize::MAX,
            })?;
        self.set_position(SpecPosition::new(self.position.row, n_col))
    }

    /// Jump to `row` and/or `col`; `None` keeps that coordinate.
    ///
    /// The last drawn extent is kept.
    pub fn reset(&mut self, row: Option<usize>, col: Option<usize>) -> DrawResult<()> {
        if row.is_none() && col.is_none() {
            return Ok(());
        }
        let target = SpecPosition::new(
            row.unwrap_or(self.position.row),
            col.unwrap_or(self.position.col),
        );
        debug!(row = target.row, col = target.col; "Drawer reset");
        self.set_position(target)
    }

    /// Remember the current position under `name`, replacing any previous one.
    pub fn add_checkpoint(&mut self, name: impl Into<String>) {
        self.dict_checkpoints.insert(name.into(), self.position);
    }

    /// Position recorded under `name`.
    pub fn checkpoint(&self, name: &str) -> Option<SpecPosition> {
        self.dict_checkpoints.get(name).copied()
    }

    /// Reset to a named checkpoint.
    pub fn reset_to_checkpoint(&mut self, name: &str) -> DrawResult<()> {
        let target = self
            .checkpoint(name)
            .ok_or_else(|| XlsxDrawError::CheckpointNotFound(name.to_string()))?;
        self.reset(Some(target.row), Some(target.col))
    }

    /// Return to the position held `steps` moves/resets ago (`1` = previous).
    pub fn fallback(&mut self, steps: usize) -> DrawResult<()> {
        let n_available = self.l_positions_prev.len();
        if steps == 0 || steps > n_available {
            return Err(XlsxDrawError::HistoryExhausted {
                steps,
                available: n_available,
            });
        }
        let target = self.l_positions_prev[n_available - steps];
        self.reset(Some(target.row), Some(target.col))
    }

    fn set_position(&mut self, target: SpecPosition) -> DrawResult<()> {
        validate_position(target.row, target.col)?;
        self.l_positions_prev.push(self.position);
        self.position = target;
        Ok(())
    }

    // #endregion
    ////////////////////////////////////////////////////////////////////////////
    // #region A1Notation

    /// Current position in A1 notation, shifted by `(rows, cols)`.
    pub fn xl_position(&self, rows: usize, cols: usize) -> DrawResult<String> {
        let target = self.position.offset(rows, cols);
        derive_a1_cell(target.row, target.col)
    }

    /// Current column letters, shifted by `cols`.
    pub fn xl_column(&self, cols: usize) -> DrawResult<String> {
        derive_column_letters(self.position.col.saturating_add(cols))
    }

    /// Current 1-based row number as text, shifted by `rows`.
    pub fn xl_row(&self, rows: usize) -> DrawResult<String> {
        let n_row = self.position.row.saturating_add(rows);
        validate_position(n_row, 0)?;
        Ok((n_row + 1).to_string())
    }

    /// Reset to an A1 reference such as `B3`.
    pub fn xl_set(&mut self, reference: &str) -> DrawResult<()> {
        let target = parse_a1_cell(reference)?;
        self.reset(Some(target.row), Some(target.col))
    }

    // #endregion
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::conf::{N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
    use crate::element::Element;
    use crate::series::Series;
    use crate::spec::{EnumCellWrite, EnumOrientation};
    use crate::surface::SheetRecorder;

    #[test]
    fn test_draw_then_moves_follow_last_extent() {
        let mut recorder = SheetRecorder::new();
        let mut drawer = Drawer::new(&mut recorder);

        drawer
            .draw(&Element::new("x").with_extent(SpecExtent::new(2, 3)))
            .unwrap();
        drawer.move_horizontal(1).unwrap();
        assert_eq!(drawer.position(), SpecPosition::new(0, 3));

        drawer.draw(&Element::new("y")).unwrap();
        drawer.move_vertical(1).unwrap();
        assert_eq!(drawer.position(), SpecPosition::new(1, 3));

        assert_eq!(
            recorder.cell(0, 0).unwrap().0,
            &EnumCellWrite::String("x".to_string())
        );
        assert_eq!(
            recorder.cell(0, 3).unwrap().0,
            &EnumCellWrite::String("y".to_string())
        );
        assert_eq!(
            recorder.merges(),
            vec![(SpecPosition::new(0, 0), SpecPosition::new(1, 2))]
        );
    }

    #[test]
    fn test_consecutive_moves_are_cumulative() {
        let mut recorder = SheetRecorder::new();
        let mut drawer = Drawer::new(&mut recorder);
        drawer
            .draw(&Element::new(1.0).with_extent(SpecExtent::new(2, 1)))
            .unwrap();
        drawer.move_vertical(1).unwrap();
        drawer.move_vertical(1).unwrap();
        assert_eq!(drawer.row(), 4);
        drawer.move_vertical(3).unwrap();
        assert_eq!(drawer.row(), 10);
    }

    #[test]
    fn test_reset_changes_only_given_axes() {
        let mut recorder = SheetRecorder::new();
        let mut drawer = Drawer::at(&mut recorder, SpecPosition::new(4, 5)).unwrap();

        drawer.reset(Some(7), None).unwrap();
        assert_eq!(drawer.position(), SpecPosition::new(7, 5));
        drawer.reset(None, Some(1)).unwrap();
        assert_eq!(drawer.position(), SpecPosition::new(7, 1));
        drawer.reset(None, None).unwrap();
        assert_eq!(drawer.position(), SpecPosition::new(7, 1));
        assert_eq!(drawer.history().len(), 2);
    }

    #[test]
    fn test_reset_keeps_last_extent() {
        let mut recorder = SheetRecorder::new();
        let mut drawer = Drawer::new(&mut recorder);
        drawer
            .draw(&Element::new("a").with_extent(SpecExtent::new(3, 2)))
            .unwrap();
        drawer.reset(Some(10), Some(10)).unwrap();
        assert_eq!(drawer.extent_last(), SpecExtent::new(3, 2));
    }

    #[test]
    fn test_moves_outside_grid_fail_without_moving() {
        let mut recorder = SheetRecorder::new();
        let mut drawer = Drawer::at(&mut recorder, SpecPosition::new(1_048_575, 16_383)).unwrap();
        assert!(matches!(
            drawer.move_vertical(1),
            Err(XlsxDrawError::OutOfGrid { .. })
        ));
        assert!(drawer.move_horizontal(1).is_err());
        assert!(drawer.reset(Some(2_000_000), None).is_err());
        assert_eq!(drawer.position(), SpecPosition::new(1_048_575, 16_383));
    }

    #[test]
    fn test_invalid_extent_fails_before_any_write() {
        let mut recorder = SheetRecorder::new();
        let mut drawer = Drawer::new(&mut recorder);
        let err = drawer
            .draw(&Element::new("bad").with_extent(SpecExtent::new(0, 2)))
            .unwrap_err();
        assert!(matches!(err, XlsxDrawError::InvalidExtent { .. }));
        assert_eq!(drawer.extent_last(), SpecExtent::UNIT);
        assert!(recorder.ops().is_empty());
    }

    #[test]
    fn test_element_past_grid_edge_is_rejected() {
        let l_cases = [
            (SpecPosition::new(N_NROWS_EXCEL_MAX - 1, 0), SpecExtent::new(2, 1)),
            (SpecPosition::new(0, N_NCOLS_EXCEL_MAX - 1), SpecExtent::new(1, 2)),
            (SpecPosition::new(1, 0), SpecExtent::new(usize::MAX, 1)),
            (SpecPosition::new(0, 1), SpecExtent::new(1, usize::MAX)),
        ];
        for (anchor, extent) in l_cases {
            let mut recorder = SheetRecorder::new();
            let mut drawer = Drawer::at(&mut recorder, anchor).unwrap();
            let err = drawer
                .draw(&Element::new("x").with_extent(extent))
                .unwrap_err();
            assert!(
                matches!(err, XlsxDrawError::InvalidExtent { .. }),
                "{anchor:?} {extent:?}"
            );
            assert_eq!(drawer.extent_last(), SpecExtent::UNIT);
            assert!(recorder.ops().is_empty());
        }
    }

    #[test]
    fn test_composite_with_invalid_later_child_writes_nothing() {
        let series = Series::from_elements(
            vec![
                Element::new("a"),
                Element::new("b"),
                Element::new("c").with_extent(SpecExtent::new(1, 0)),
            ],
            EnumOrientation::Vertical,
        );
        let mut recorder = SheetRecorder::new();
        let err = Drawer::new(&mut recorder).draw(&series).unwrap_err();
        assert!(matches!(
            err,
            XlsxDrawError::InvalidExtent { row: 2, col: 0, .. }
        ));
        assert!(recorder.ops().is_empty());

        let series = Series::from_elements(
            vec![Element::new("a"), Element::new("b")],
            EnumOrientation::Horizontal,
        );
        let mut recorder = SheetRecorder::new();
        let mut drawer =
            Drawer::at(&mut recorder, SpecPosition::new(0, N_NCOLS_EXCEL_MAX - 1)).unwrap();
        assert!(drawer.draw(&series).is_err());
        assert!(recorder.ops().is_empty());
    }

    #[test]
    fn test_a1_helpers_reject_offsets_past_grid() {
        let mut recorder = SheetRecorder::new();
        let drawer = Drawer::at(&mut recorder, SpecPosition::new(3, 3)).unwrap();
        assert!(drawer.xl_position(usize::MAX, 0).is_err());
        assert!(drawer.xl_position(0, usize::MAX).is_err());
        assert!(drawer.xl_column(usize::MAX).is_err());
        assert!(drawer.xl_row(usize::MAX).is_err());
        assert_eq!(drawer.xl_row(N_NROWS_EXCEL_MAX - 4).unwrap(), "1048576");
    }

    #[test]
    fn test_checkpoints_and_fallback() {
        let mut recorder = SheetRecorder::new();
        let mut drawer = Drawer::new(&mut recorder);
        drawer.add_checkpoint("top");
        drawer.draw(&Element::new("a")).unwrap();
        drawer.move_vertical(1).unwrap();
        drawer.move_horizontal(1).unwrap();
        assert_eq!(drawer.position(), SpecPosition::new(1, 1));

        drawer.fallback(1).unwrap();
        assert_eq!(drawer.position(), SpecPosition::new(1, 0));

        drawer.reset_to_checkpoint("top").unwrap();
        assert_eq!(drawer.position(), SpecPosition::new(0, 0));

        assert!(matches!(
            drawer.reset_to_checkpoint("missing"),
            Err(XlsxDrawError::CheckpointNotFound(_))
        ));
        assert!(matches!(
            drawer.fallback(100),
            Err(XlsxDrawError::HistoryExhausted { .. })
        ));
    }

    #[test]
    fn test_a1_helpers() {
        let mut recorder = SheetRecorder::new();
        let mut drawer = Drawer::new(&mut recorder);
        drawer.xl_set("C5").unwrap();
        assert_eq!(drawer.position(), SpecPosition::new(4, 2));
        assert_eq!(drawer.xl_position(0, 0).unwrap(), "C5");
        assert_eq!(drawer.xl_position(1, 1).unwrap(), "D6");
        assert_eq!(drawer.xl_column(0).unwrap(), "C");
        assert_eq!(drawer.xl_row(0).unwrap(), "5");
        assert!(drawer.xl_set("not a cell").is_err());
    }

    proptest! {
        #[test]
        fn prop_move_vertical_advances_by_height(
            row in 0usize..1000,
            col in 0usize..1000,
            height in 1usize..20,
            width in 1usize..20,
        ) {
            let mut recorder = SheetRecorder::new();
            let mut drawer = Drawer::at(&mut recorder, SpecPosition::new(row, col)).unwrap();
            drawer.draw(&Element::new("v").with_extent(SpecExtent::new(height, width))).unwrap();
            drawer.move_vertical(1).unwrap();
            prop_assert_eq!(drawer.position(), SpecPosition::new(row + height, col));
        }

        #[test]
        fn prop_move_horizontal_advances_by_width(
            row in 0usize..1000,
            col in 0usize..1000,
            height in 1usize..20,
            width in 1usize..20,
        ) {
            let mut recorder = SheetRecorder::new();
            let mut drawer = Drawer::at(&mut recorder, SpecPosition::new(row, col)).unwrap();
            drawer.draw(&Element::new("h").with_extent(SpecExtent::new(height, width))).unwrap();
            drawer.move_horizontal(1).unwrap();
            prop_assert_eq!(drawer.position(), SpecPosition::new(row, col + width));
        }
    }
}
