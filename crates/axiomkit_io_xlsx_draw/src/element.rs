//! Atomic drawable unit.

use log::trace;

use crate::conf::{N_PADDING_AUTOFIT_DEFAULT, N_WIDTH_EXCEL_COLUMN_MAX};
use crate::drawer::Drawable;
use crate::error::DrawResult;
use crate::spec::{
    EnumCellValue, EnumColumnWidth, EnumWriteMethod, SpecCellComment, SpecCellFormat, SpecExtent,
    SpecPosition,
};
use crate::surface::GridSurface;
use crate::util::{
    derive_a1_range, derive_write_method_name, estimate_unicode_string_width, merge_styles,
    resolve_cell_write, validate_region,
};

/// One value written into one (possibly merged) region.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    value: EnumCellValue,
    style: SpecCellFormat,
    extent: SpecExtent,
    write_method: EnumWriteMethod,
    comment: Option<SpecCellComment>,
    col_width: Option<EnumColumnWidth>,
    padding: f64,
}

/// Single element property replaced by [`Element::with_property`].
#[derive(Debug, Clone, PartialEq)]
pub enum EnumElementProperty {
    Value(EnumCellValue),
    /// Replace the whole style.
    Style(SpecCellFormat),
    /// Overlay onto the current style.
    StylePatch(SpecCellFormat),
    Extent(SpecExtent),
    WriteMethod(EnumWriteMethod),
    Comment(Option<SpecCellComment>),
    ColumnWidth(Option<EnumColumnWidth>),
    Padding(f64),
}

impl Default for Element {
    fn default() -> Self {
        Self::new(EnumCellValue::None)
    }
}

impl Element {
    /// 1x1 element with empty style and generic write.
    pub fn new(value: impl Into<EnumCellValue>) -> Self {
        Self {
            value: value.into(),
            style: SpecCellFormat::default(),
            extent: SpecExtent::UNIT,
            write_method: EnumWriteMethod::Write,
            comment: None,
            col_width: None,
            padding: N_PADDING_AUTOFIT_DEFAULT,
        }
    }

    pub fn value(&self) -> &EnumCellValue {
        &self.value
    }

    pub fn style(&self) -> &SpecCellFormat {
        &self.style
    }

    pub fn write_method(&self) -> &EnumWriteMethod {
        &self.write_method
    }

    pub fn comment(&self) -> Option<&SpecCellComment> {
        self.comment.as_ref()
    }

    pub fn col_width(&self) -> Option<EnumColumnWidth> {
        self.col_width
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Copy with one property replaced.
    pub fn with_property(&self, property: EnumElementProperty) -> Self {
        let mut elem = self.clone();
        match property {
            EnumElementProperty::Value(value) => elem.value = value,
            EnumElementProperty::Style(style) => elem.style = style,
            EnumElementProperty::StylePatch(patch) => {
                elem.style = merge_styles(&elem.style, &patch)
            }
            EnumElementProperty::Extent(extent) => elem.extent = extent,
            EnumElementProperty::WriteMethod(method) => elem.write_method = method,
            EnumElementProperty::Comment(comment) => elem.comment = comment,
            EnumElementProperty::ColumnWidth(width) => elem.col_width = width,
            EnumElementProperty::Padding(padding) => elem.padding = padding,
        }
        elem
    }

    pub fn with_value(mut self, value: impl Into<EnumCellValue>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_style(mut self, style: SpecCellFormat) -> Self {
        self.style = style;
        self
    }

    /// Overlay `patch` onto the current style (last wins).
    pub fn with_style_patch(mut self, patch: &SpecCellFormat) -> Self {
        self.style = merge_styles(&self.style, patch);
        self
    }

    pub fn with_extent(mut self, extent: SpecExtent) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_write_method(mut self, write_method: EnumWriteMethod) -> Self {
        self.write_method = write_method;
        self
    }

    pub fn with_comment(mut self, comment: SpecCellComment) -> Self {
        self.comment = Some(comment);
        self
    }

    pub fn with_col_width(mut self, col_width: EnumColumnWidth) -> Self {
        self.col_width = Some(col_width);
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// A1 range this element covers when drawn at `position`.
    pub fn xl_range(&self, position: SpecPosition) -> DrawResult<String> {
        derive_a1_range(position, self.extent)
    }

    /// Text shown in the cell, used for width estimation.
    pub fn derive_display_text(&self, na_rep: &str) -> String {
        match &self.write_method {
            EnumWriteMethod::Blank => String::new(),
            EnumWriteMethod::RichString { segments } => {
                segments.iter().map(|seg| seg.text.as_str()).collect()
            }
            EnumWriteMethod::Url {
                text: Some(text), ..
            } => text.clone(),
            _ => self.value.to_display_text(na_rep),
        }
    }

    /// Auto-fit width of the displayed text, `None` when nothing is shown.
    pub fn calculate_autofit_width(&self, na_rep: &str) -> Option<f64> {
        let c_text = self.derive_display_text(na_rep);
        if c_text.is_empty() {
            return None;
        }
        Some(estimate_unicode_string_width(&c_text) as f64 + 2.0 * self.padding)
    }

    /// Width per covered column, `None` when no width applies.
    fn calculate_column_width(&self, na_rep: &str) -> Option<f64> {
        let n_total = match self.col_width? {
            EnumColumnWidth::Fixed(n_width) => n_width,
            EnumColumnWidth::Auto => self.calculate_autofit_width(na_rep)?,
        };
        Some((n_total / self.extent.width as f64).clamp(0.0, N_WIDTH_EXCEL_COLUMN_MAX))
    }
}

impl Drawable for Element {
    fn extent(&self) -> SpecExtent {
        self.extent
    }

    fn validate(&self, anchor: SpecPosition) -> DrawResult<()> {
        validate_region(anchor, self.extent)
    }

    fn render(
        &self,
        surface: &mut dyn GridSurface,
        anchor: SpecPosition,
        na_rep: &str,
    ) -> DrawResult<()> {
        validate_region(anchor, self.extent)?;
        let SpecPosition { row, col } = anchor;
        let cell_write = resolve_cell_write(
            &self.value,
            &self.write_method,
            &self.style,
            na_rep,
            row,
            col,
        )?;

        if self.extent.is_merged() {
            surface.merge_range(
                row,
                col,
                row + self.extent.height - 1,
                col + self.extent.width - 1,
                &self.style,
            )?;
        }
        trace!(
            row = row,
            col = col,
            method = derive_write_method_name(&self.write_method);
            "Writing element"
        );
        surface.write_cell(row, col, &cell_write, &self.style)?;

        if let Some(comment) = &self.comment {
            surface.add_comment(row, col, comment)?;
        }
        if let Some(n_width) = self.calculate_column_width(na_rep) {
            for n_col in col..col + self.extent.width {
                surface.set_column_width(n_col, n_width)?;
            }
        }
        Ok(())
    }
}
