//! One-dimensional run of elements along an axis.

use log::debug;

use crate::conf::{N_PADDING_AUTOFIT_DEFAULT, N_WIDTH_EXCEL_COLUMN_MAX};
use crate::drawer::{Drawable, Drawer};
use crate::element::{Element, EnumElementProperty};
use crate::error::{DrawResult, XlsxDrawError};
use crate::spec::{
    EnumBorderSide, EnumBoundaryStyle, EnumCellValue, EnumColumnWidth, EnumOrientation,
    EnumWriteMethod, SpecCellFormat, SpecExtent, SpecPosition,
};
use crate::surface::GridSurface;
use crate::util::{merge_styles, validate_region_allow_empty};

/// Options for building a [`Series`] from raw values.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSeriesOptions {
    /// Layout axis.
    pub orientation: EnumOrientation,
    /// Extent of every value cell.
    pub cell_extent: SpecExtent,
    /// Base style of every cell.
    pub style: SpecCellFormat,
    /// Overlay on the first value cell.
    pub first: Option<EnumBoundaryStyle>,
    /// Overlay on the last value cell.
    pub last: Option<EnumBoundaryStyle>,
    /// Write method of every value cell.
    pub write_method: EnumWriteMethod,
    /// Optional name cell drawn before the values.
    pub name: Option<EnumCellValue>,
    /// Overlay on the base style for the name cell.
    pub name_style: SpecCellFormat,
    /// Column width (vertical) or row height (horizontal) rule.
    pub col_width: Option<EnumColumnWidth>,
    /// Padding for auto width.
    pub padding: f64,
}

impl Default for SpecSeriesOptions {
    fn default() -> Self {
        Self {
            orientation: EnumOrientation::Vertical,
            cell_extent: SpecExtent::UNIT,
            style: SpecCellFormat::default(),
            first: None,
            last: None,
            write_method: EnumWriteMethod::Write,
            name: None,
            name_style: SpecCellFormat::default(),
            col_width: None,
            padding: N_PADDING_AUTOFIT_DEFAULT,
        }
    }
}

/// Ordered elements drawn back to back along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: Option<Element>,
    l_elements: Vec<Element>,
    orientation: EnumOrientation,
    col_width: Option<EnumColumnWidth>,
    padding: f64,
}

impl Series {
    /// Build value cells from `values` using `options`.
    pub fn from_values<I, V>(values: I, options: &SpecSeriesOptions) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<EnumCellValue>,
    {
        let l_elements = values
            .into_iter()
            .map(|value| {
                Element::new(value)
                    .with_extent(options.cell_extent)
                    .with_style(options.style.clone())
                    .with_write_method(options.write_method.clone())
            })
            .collect();
        let name = options.name.clone().map(|value| {
            Element::new(value)
                .with_extent(options.cell_extent)
                .with_style(merge_styles(&options.style, &options.name_style))
        });

        let mut series = Self::from_elements(l_elements, options.orientation)
            .with_boundaries(options.first.as_ref(), options.last.as_ref());
        series.name = name;
        series.col_width = options.col_width;
        series.padding = options.padding;
        series
    }

    /// Wrap prebuilt elements.
    pub fn from_elements(elements: Vec<Element>, orientation: EnumOrientation) -> Self {
        Self {
            name: None,
            l_elements: elements,
            orientation,
            col_width: None,
            padding: N_PADDING_AUTOFIT_DEFAULT,
        }
    }

    pub fn len(&self) -> usize {
        self.l_elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.l_elements.is_empty()
    }

    pub fn elements(&self) -> &[Element] {
        &self.l_elements
    }

    pub fn name(&self) -> Option<&Element> {
        self.name.as_ref()
    }

    pub fn orientation(&self) -> EnumOrientation {
        self.orientation
    }

    pub fn with_name(mut self, name: Element) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_col_width(mut self, col_width: Option<EnumColumnWidth>, padding: f64) -> Self {
        self.col_width = col_width;
        self.padding = padding;
        self
    }

    /// Overlay `first`/`last` on the outward side of the first/last value cell.
    ///
    /// With a single cell both apply and `last` wins on conflicts.
    pub fn with_boundaries(
        mut self,
        first: Option<&EnumBoundaryStyle>,
        last: Option<&EnumBoundaryStyle>,
    ) -> Self {
        let (side_first, side_last) = match self.orientation {
            EnumOrientation::Vertical => (EnumBorderSide::Top, EnumBorderSide::Bottom),
            EnumOrientation::Horizontal => (EnumBorderSide::Left, EnumBorderSide::Right),
        };
        if let Some(boundary) = first
            && let Some(elem) = self.l_elements.first_mut()
        {
            *elem = elem.clone().with_style_patch(&boundary.to_format(side_first));
        }
        if let Some(boundary) = last
            && let Some(elem) = self.l_elements.last_mut()
        {
            *elem = elem.clone().with_style_patch(&boundary.to_format(side_last));
        }
        self
    }

    /// Copy with `patch` overlaid on every value cell.
    pub fn with_style_patch(&self, patch: &SpecCellFormat) -> Self {
        self.with_property(EnumElementProperty::StylePatch(patch.clone()))
    }

    /// Copy with one patch per value cell.
    pub fn with_style_patches(&self, patches: &[SpecCellFormat]) -> DrawResult<Self> {
        if patches.len() != self.l_elements.len() {
            return Err(XlsxDrawError::LengthMismatch {
                expected: self.l_elements.len(),
                actual: patches.len(),
            });
        }
        let mut series = self.clone();
        for (elem, patch) in series.l_elements.iter_mut().zip(patches) {
            *elem = elem.clone().with_style_patch(patch);
        }
        Ok(series)
    }

    /// Copy with `property` set on every value cell.
    pub fn with_property(&self, property: EnumElementProperty) -> Self {
        let mut series = self.clone();
        series.l_elements = self
            .l_elements
            .iter()
            .map(|elem| elem.with_property(property.clone()))
            .collect();
        series
    }

    fn iter_drawn(&self) -> impl Iterator<Item = &Element> {
        self.name.iter().chain(self.l_elements.iter())
    }

    fn derive_child_positions(&self, anchor: SpecPosition) -> Vec<(SpecPosition, &Element)> {
        let mut position = anchor;
        self.iter_drawn()
            .map(|elem| {
                let current = position;
                let extent = elem.extent();
                position = match self.orientation {
                    EnumOrientation::Vertical => position.offset(extent.height, 0),
                    EnumOrientation::Horizontal => position.offset(0, extent.width),
                };
                (current, elem)
            })
            .collect()
    }

    fn apply_size(
        &self,
        surface: &mut dyn GridSurface,
        anchor: SpecPosition,
        na_rep: &str,
    ) -> DrawResult<()> {
        let Some(col_width) = self.col_width else {
            return Ok(());
        };
        let extent = self.extent();
        match (self.orientation, col_width) {
            (EnumOrientation::Vertical, EnumColumnWidth::Fixed(n_total)) => {
                let n_width = (n_total / extent.width as f64).min(N_WIDTH_EXCEL_COLUMN_MAX);
                for n_col in anchor.col..anchor.col + extent.width {
                    surface.set_column_width(n_col, n_width)?;
                }
            }
            (EnumOrientation::Vertical, EnumColumnWidth::Auto) => {
                let n_total = self
                    .iter_drawn()
                    .filter_map(|elem| {
                        elem.with_property(EnumElementProperty::Padding(self.padding))
                            .calculate_autofit_width(na_rep)
                    })
                    .fold(0.0, f64::max);
                if n_total > 0.0 {
                    let n_width =
                        (n_total / extent.width as f64).min(N_WIDTH_EXCEL_COLUMN_MAX);
                    for n_col in anchor.col..anchor.col + extent.width {
                        surface.set_column_width(n_col, n_width)?;
                    }
                }
            }
            (EnumOrientation::Horizontal, EnumColumnWidth::Fixed(n_total)) => {
                let n_height = n_total / extent.height as f64;
                for n_row in anchor.row..anchor.row + extent.height {
                    surface.set_row_height(n_row, n_height)?;
                }
            }
            // Row height has no text-based fit.
            (EnumOrientation::Horizontal, EnumColumnWidth::Auto) => {}
        }
        Ok(())
    }
}

impl Drawable for Series {
    fn extent(&self) -> SpecExtent {
        self.iter_drawn()
            .fold(SpecExtent::EMPTY, |acc, elem| match self.orientation {
                EnumOrientation::Vertical => acc.stack_vertical(&elem.extent()),
                EnumOrientation::Horizontal => acc.stack_horizontal(&elem.extent()),
            })
    }

    fn validate(&self, anchor: SpecPosition) -> DrawResult<()> {
        validate_region_allow_empty(anchor, self.extent())?;
        for (position, elem) in self.derive_child_positions(anchor) {
            elem.validate(position)?;
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
            len = self.len(),
            if_named = self.name.is_some();
            "Laying out series"
        );
        {
            let mut drawer = Drawer::at(&mut *surface, anchor)?.with_na_rep(na_rep);
            for (idx, elem) in self.iter_drawn().enumerate() {
                if idx > 0 {
                    match self.orientation {
                        EnumOrientation::Vertical => drawer.move_vertical(1)?,
                        EnumOrientation::Horizontal => drawer.move_horizontal(1)?,
                    }
                }
                drawer.draw(elem)?;
            }
        }
        self.apply_size(surface, anchor, na_rep)
    }
}
