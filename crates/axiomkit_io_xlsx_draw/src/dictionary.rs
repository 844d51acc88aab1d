//! Key/value list layout and its YAML document loader.

use std::fs;
use std::path::Path;

use log::debug;
use serde_yaml::Value;

use crate::conf::{
    N_DICT_HSPACE_DEFAULT, N_DICT_NESTING_DEPTH_MAX, N_DICT_VSPACE_DEFAULT, N_NROWS_EXCEL_MAX,
};
use crate::drawer::{Drawable, Drawer};
use crate::element::Element;
use crate::error::{DrawResult, XlsxDrawError};
use crate::spec::{
    EnumCellValue, EnumColumnWidth, EnumWriteMethod, SpecCellComment, SpecCellFormat,
    SpecCommentOptions, SpecExtent, SpecPosition,
};
use crate::surface::GridSurface;
use crate::util::validate_region_allow_empty;

////////////////////////////////////////////////////////////////////////////////
// #region DictionarySpecification

/// Element parameters layered as dictionary defaults, pair params, then cell params.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecDictCellParams {
    /// Style merged over the lower layers.
    pub style: SpecCellFormat,
    /// Cell extent; `None` keeps the lower layer or 1x1.
    pub extent: Option<SpecExtent>,
    /// Write method; `None` keeps the lower layer or generic write.
    pub write_method: Option<EnumWriteMethod>,
    /// Note on the cell.
    pub comment: Option<SpecCellComment>,
    /// Column width rule for the columns the cell covers.
    pub col_width: Option<EnumColumnWidth>,
}

impl SpecDictCellParams {
    /// Overlay `other` onto `self`; styles merge, other fields replace when set.
    pub fn merge(&self, other: &SpecDictCellParams) -> SpecDictCellParams {
        SpecDictCellParams {
            style: self.style.merge(&other.style),
            extent: other.extent.or(self.extent),
            write_method: other
                .write_method
                .clone()
                .or_else(|| self.write_method.clone()),
            comment: other.comment.clone().or_else(|| self.comment.clone()),
            col_width: other.col_width.or(self.col_width),
        }
    }
}

/// Single value cell with its own parameter overrides.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecDictCell {
    pub value: EnumCellValue,
    pub params: SpecDictCellParams,
}

impl SpecDictCell {
    pub fn new(value: impl Into<EnumCellValue>) -> Self {
        Self {
            value: value.into(),
            params: SpecDictCellParams::default(),
        }
    }

    pub fn with_params(mut self, params: SpecDictCellParams) -> Self {
        self.params = params;
        self
    }

    /// Element for this cell with `defaults` under the cell's own params.
    pub fn to_element(&self, defaults: &SpecDictCellParams) -> Element {
        let params = defaults.merge(&self.params);
        let mut elem = Element::new(self.value.clone())
            .with_style(params.style)
            .with_extent(params.extent.unwrap_or(SpecExtent::UNIT))
            .with_write_method(params.write_method.unwrap_or_default());
        if let Some(comment) = params.comment {
            elem = elem.with_comment(comment);
        }
        if let Some(col_width) = params.col_width {
            elem = elem.with_col_width(col_width);
        }
        elem
    }
}

/// Value side of a dictionary pair.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumDictValue {
    /// One cell.
    Scalar(SpecDictCell),
    /// Values stacked top to bottom.
    List(Vec<EnumDictValue>),
    /// Inner key/value block.
    Nested(Vec<SpecDictPair>),
}

impl EnumDictValue {
    pub fn scalar(value: impl Into<EnumCellValue>) -> Self {
        Self::Scalar(SpecDictCell::new(value))
    }

    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<EnumCellValue>,
    {
        Self::List(values.into_iter().map(Self::scalar).collect())
    }

    /// Deepest nesting level below this value (`0` for scalars and flat lists).
    fn derive_depth(&self) -> usize {
        match self {
            Self::Scalar(_) => 0,
            Self::List(l_items) => l_items.iter().map(Self::derive_depth).max().unwrap_or(0),
            Self::Nested(l_pairs) => 1 + derive_pairs_depth(l_pairs),
        }
    }
}

/// One key and its value block.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDictPair {
    pub key: SpecDictCell,
    pub value: EnumDictValue,
    /// Defaults for every value cell of this pair.
    pub value_params: SpecDictCellParams,
    /// Blank rows after this pair; falls back to the dictionary default.
    pub vspace: Option<usize>,
    /// Blank columns between key and value; falls back to the dictionary default.
    pub hspace: Option<usize>,
}

impl SpecDictPair {
    pub fn new(key: impl Into<EnumCellValue>, value: EnumDictValue) -> Self {
        Self {
            key: SpecDictCell::new(key),
            value,
            value_params: SpecDictCellParams::default(),
            vspace: None,
            hspace: None,
        }
    }

    pub fn with_key_params(mut self, params: SpecDictCellParams) -> Self {
        self.key.params = params;
        self
    }

    pub fn with_value_params(mut self, params: SpecDictCellParams) -> Self {
        self.value_params = params;
        self
    }

    pub fn with_vspace(mut self, vspace: usize) -> Self {
        self.vspace = Some(vspace);
        self
    }

    pub fn with_hspace(mut self, hspace: usize) -> Self {
        self.hspace = Some(hspace);
        self
    }
}

/// Dictionary-wide spacing and default params.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDictionaryOptions {
    /// Blank columns between a key and its value.
    pub hspace: usize,
    /// Blank rows after each pair.
    pub vspace: usize,
    /// Defaults for every key cell.
    pub key_params: SpecDictCellParams,
    /// Defaults for every value cell, nested levels included.
    pub value_params: SpecDictCellParams,
}

impl Default for SpecDictionaryOptions {
    fn default() -> Self {
        Self {
            hspace: N_DICT_HSPACE_DEFAULT,
            vspace: N_DICT_VSPACE_DEFAULT,
            key_params: SpecDictCellParams::default(),
            value_params: SpecDictCellParams::default(),
        }
    }
}

fn derive_pairs_depth(pairs: &[SpecDictPair]) -> usize {
    pairs
        .iter()
        .map(|pair| pair.value.derive_depth())
        .max()
        .unwrap_or(0)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Dictionary

/// Ordered key/value pairs laid out as a two-column block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    l_pairs: Vec<SpecDictPair>,
    options: SpecDictionaryOptions,
}

impl Dictionary {
    pub fn new(pairs: Vec<SpecDictPair>, options: SpecDictionaryOptions) -> Self {
        Self {
            l_pairs: pairs,
            options,
        }
    }

    pub fn pairs(&self) -> &[SpecDictPair] {
        &self.l_pairs
    }

    pub fn options(&self) -> &SpecDictionaryOptions {
        &self.options
    }

    pub fn push(&mut self, pair: SpecDictPair) {
        self.l_pairs.push(pair);
    }

    /// Nesting depth; top-level pairs are depth 0.
    pub fn depth(&self) -> usize {
        derive_pairs_depth(&self.l_pairs)
    }

    fn validate_depth(&self) -> DrawResult<()> {
        let n_depth = self.depth();
        if n_depth > N_DICT_NESTING_DEPTH_MAX {
            return Err(XlsxDrawError::NestingTooDeep {
                depth: n_depth,
                max: N_DICT_NESTING_DEPTH_MAX,
            });
        }
        Ok(())
    }

    fn create_block<'a>(
        &'a self,
        pairs: &'a [SpecDictPair],
        value_defaults: SpecDictCellParams,
    ) -> DictPairsBlock<'a> {
        DictPairsBlock {
            options: &self.options,
            pairs,
            value_defaults,
        }
    }
}

impl Drawable for Dictionary {
    fn extent(&self) -> SpecExtent {
        self.create_block(&self.l_pairs, self.options.value_params.clone())
            .extent()
    }

    fn validate(&self, anchor: SpecPosition) -> DrawResult<()> {
        self.validate_depth()?;
        validate_region_allow_empty(anchor, self.extent())?;
        self.create_block(&self.l_pairs, self.options.value_params.clone())
            .validate(anchor)
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
            n_pairs = self.l_pairs.len();
            "Laying out dictionary"
        );
        self.create_block(&self.l_pairs, self.options.value_params.clone())
            .render(surface, anchor, na_rep)
    }
}

/// Pairs drawn at one nesting level.
struct DictPairsBlock<'a> {
    options: &'a SpecDictionaryOptions,
    pairs: &'a [SpecDictPair],
    value_defaults: SpecDictCellParams,
}

impl<'a> DictPairsBlock<'a> {
    fn create_value_block(&self, pair: &'a SpecDictPair) -> DictValueBlock<'a> {
        DictValueBlock {
            options: self.options,
            value: &pair.value,
            params: self.value_defaults.merge(&pair.value_params),
        }
    }

    fn derive_spacing(&self, pair: &SpecDictPair) -> (usize, usize) {
        (
            pair.hspace.unwrap_or(self.options.hspace),
            pair.vspace.unwrap_or(self.options.vspace),
        )
    }
}

impl Drawable for DictPairsBlock<'_> {
    fn extent(&self) -> SpecExtent {
        self.pairs
            .iter()
            .fold(SpecExtent::EMPTY, |acc, pair| {
                let ext_key = pair.key.to_element(&self.options.key_params).extent();
                let ext_value = self.create_value_block(pair).extent();
                let (n_hspace, n_vspace) = self.derive_spacing(pair);
                let n_width = if ext_value.is_empty() {
                    ext_key.width
                } else {
                    ext_key
                        .width
                        .saturating_add(n_hspace)
                        .saturating_add(ext_value.width)
                };
                let n_height = ext_key.height.max(ext_value.height).saturating_add(n_vspace);
                acc.stack_vertical(&SpecExtent::new(n_height, n_width))
            })
    }

    /// Check every key and value cell at the position it will be drawn.
    fn validate(&self, anchor: SpecPosition) -> DrawResult<()> {
        let mut n_row = anchor.row;
        for pair in self.pairs {
            let key = pair.key.to_element(&self.options.key_params);
            let block = self.create_value_block(pair);
            let (ext_key, ext_value) = (key.extent(), block.extent());
            let (n_hspace, n_vspace) = self.derive_spacing(pair);

            key.validate(SpecPosition::new(n_row, anchor.col))?;
            let n_col_value = anchor.col.saturating_add(ext_key.width).saturating_add(n_hspace);
            block.validate(SpecPosition::new(n_row, n_col_value))?;
            n_row = n_row
                .saturating_add(ext_key.height.max(ext_value.height))
                .saturating_add(n_vspace);
        }
        Ok(())
    }

    fn render(
        &self,
        surface: &mut dyn GridSurface,
        anchor: SpecPosition,
        na_rep: &str,
    ) -> DrawResult<()> {
        let mut drawer = Drawer::at(surface, anchor)?.with_na_rep(na_rep);
        let mut n_row = anchor.row;
        for pair in self.pairs {
            let key = pair.key.to_element(&self.options.key_params);
            let block = self.create_value_block(pair);
            let (ext_key, ext_value) = (key.extent(), block.extent());
            let (n_hspace, n_vspace) = self.derive_spacing(pair);

            drawer.reset(Some(n_row), Some(anchor.col))?;
            drawer.draw(&key)?;
            if !ext_value.is_empty() {
                drawer.reset(None, Some(anchor.col + ext_key.width + n_hspace))?;
                drawer.draw(&block)?;
            }
            n_row += ext_key.height.max(ext_value.height) + n_vspace;
        }
        Ok(())
    }
}

/// Value side of one pair with its resolved default params.
struct DictValueBlock<'a> {
    options: &'a SpecDictionaryOptions,
    value: &'a EnumDictValue,
    params: SpecDictCellParams,
}

impl<'a> DictValueBlock<'a> {
    fn create_item_block(&self, value: &'a EnumDictValue) -> DictValueBlock<'a> {
        DictValueBlock {
            options: self.options,
            value,
            params: self.params.clone(),
        }
    }
}

impl Drawable for DictValueBlock<'_> {
    fn extent(&self) -> SpecExtent {
        match self.value {
            EnumDictValue::Scalar(cell) => cell.to_element(&self.params).extent(),
            EnumDictValue::List(l_items) => l_items.iter().fold(SpecExtent::EMPTY, |acc, item| {
                acc.stack_vertical(&self.create_item_block(item).extent())
            }),
            EnumDictValue::Nested(l_pairs) => DictPairsBlock {
                options: self.options,
                pairs: l_pairs,
                value_defaults: self.params.clone(),
            }
            .extent(),
        }
    }

    fn validate(&self, anchor: SpecPosition) -> DrawResult<()> {
        match self.value {
            EnumDictValue::Scalar(cell) => cell.to_element(&self.params).validate(anchor),
            EnumDictValue::List(l_items) => {
                let mut n_row = anchor.row;
                for item in l_items {
                    let block = self.create_item_block(item);
                    block.validate(SpecPosition::new(n_row, anchor.col))?;
                    n_row = n_row.saturating_add(block.extent().height);
                }
                Ok(())
            }
            EnumDictValue::Nested(l_pairs) => DictPairsBlock {
                options: self.options,
                pairs: l_pairs,
                value_defaults: self.params.clone(),
            }
            .validate(anchor),
        }
    }

    fn render(
        &self,
        surface: &mut dyn GridSurface,
        anchor: SpecPosition,
        na_rep: &str,
    ) -> DrawResult<()> {
        match self.value {
            EnumDictValue::Scalar(cell) => {
                Drawer::at(surface, anchor)?
                    .with_na_rep(na_rep)
                    .draw(&cell.to_element(&self.params))?;
            }
            EnumDictValue::List(l_items) => {
                let mut drawer = Drawer::at(surface, anchor)?.with_na_rep(na_rep);
                let mut n_row = anchor.row;
                for item in l_items {
                    let block = self.create_item_block(item);
                    let extent = block.extent();
                    if extent.is_empty() {
                        continue;
                    }
                    drawer.reset(Some(n_row), None)?;
                    drawer.draw(&block)?;
                    n_row += extent.height;
                }
            }
            EnumDictValue::Nested(l_pairs) => {
                DictPairsBlock {
                    options: self.options,
                    pairs: l_pairs,
                    value_defaults: self.params.clone(),
                }
                .render(surface, anchor, na_rep)?;
            }
        }
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DocumentLoading

impl Dictionary {
    /// Parse an ordered YAML document.
    ///
    /// The document is a sequence of entries:
    ///
    /// ```yaml
    /// - key: {value: Name, style: {bold: true}}
    ///   value: {value: Alice, width: 2}
    ///   vspace: 1
    /// - key: {value: Tags}
    ///   value: {value: [a, b, {value: c, style: {italic: true}}]}
    /// - key: {value: Address}
    ///   value:
    ///     value:
    ///       - key: {value: City}
    ///         value: {value: Paris}
    /// ```
    pub fn from_yaml_str(doc: &str, options: SpecDictionaryOptions) -> DrawResult<Self> {
        let root: Value = serde_yaml::from_str(doc)?;
        let dictionary = Self::new(parse_dict_entries(&root)?, options);
        dictionary.validate_depth()?;
        debug!(n_pairs = dictionary.l_pairs.len(); "Loaded dictionary document");
        Ok(dictionary)
    }

    pub fn from_yaml_file(
        path_file: impl AsRef<Path>,
        options: SpecDictionaryOptions,
    ) -> DrawResult<Self> {
        let doc = fs::read_to_string(path_file)?;
        Self::from_yaml_str(&doc, options)
    }
}

fn parse_dict_entries(node: &Value) -> DrawResult<Vec<SpecDictPair>> {
    let l_entries = node.as_sequence().ok_or_else(|| XlsxDrawError::ConfigShape {
        index: 0,
        reason: "document must be a sequence of entries".to_string(),
    })?;
    l_entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| parse_dict_entry(entry, idx))
        .collect()
}

fn parse_dict_entry(entry: &Value, idx: usize) -> DrawResult<SpecDictPair> {
    let shape = |reason: &str| XlsxDrawError::ConfigShape {
        index: idx,
        reason: reason.to_string(),
    };
    if !entry.is_mapping() {
        return Err(shape("entry must be a mapping"));
    }
    let key_map = entry
        .get("key")
        .filter(|v| v.is_mapping())
        .ok_or_else(|| shape("missing `key` mapping"))?;
    let value_map = entry
        .get("value")
        .filter(|v| v.is_mapping())
        .ok_or_else(|| shape("missing `value` mapping"))?;

    let key_value = key_map
        .get("value")
        .ok_or_else(|| shape("`key` has no `value` field"))?;
    let value_node = value_map
        .get("value")
        .ok_or_else(|| shape("`value` has no `value` field"))?;

    let key = SpecDictCell {
        value: parse_scalar(key_value, idx)?,
        params: parse_cell_params(key_map, idx)?,
    };
    Ok(SpecDictPair {
        key,
        value: parse_dict_value(value_node, idx)?,
        value_params: parse_cell_params(value_map, idx)?,
        vspace: parse_count(entry, "vspace", idx)?,
        hspace: parse_count(entry, "hspace", idx)?,
    })
}

fn parse_dict_value(node: &Value, idx: usize) -> DrawResult<EnumDictValue> {
    let Some(l_items) = node.as_sequence() else {
        return Ok(EnumDictValue::Scalar(SpecDictCell::new(parse_scalar(
            node, idx,
        )?)));
    };
    let if_nested = !l_items.is_empty()
        && l_items
            .iter()
            .all(|item| item.is_mapping() && item.get("key").is_some());
    if if_nested {
        return Ok(EnumDictValue::Nested(parse_dict_entries(node)?));
    }

    l_items
        .iter()
        .map(|item| {
            if item.is_mapping() {
                let value = item.get("value").ok_or_else(|| XlsxDrawError::ConfigShape {
                    index: idx,
                    reason: "list item mapping has no `value` field".to_string(),
                })?;
                Ok(EnumDictValue::Scalar(SpecDictCell {
                    value: parse_scalar(value, idx)?,
                    params: parse_cell_params(item, idx)?,
                }))
            } else {
                parse_dict_value(item, idx)
            }
        })
        .collect::<DrawResult<Vec<_>>>()
        .map(EnumDictValue::List)
}

fn parse_scalar(node: &Value, idx: usize) -> DrawResult<EnumCellValue> {
    match node {
        Value::Null => Ok(EnumCellValue::None),
        Value::Bool(b) => Ok(EnumCellValue::Boolean(*b)),
        Value::Number(n) => Ok(n.as_f64().map_or(EnumCellValue::None, EnumCellValue::Number)),
        Value::String(s) => Ok(EnumCellValue::String(s.clone())),
        _ => Err(XlsxDrawError::ConfigShape {
            index: idx,
            reason: "cell value must be a scalar".to_string(),
        }),
    }
}

fn parse_cell_params(map: &Value, idx: usize) -> DrawResult<SpecDictCellParams> {
    let mut params = SpecDictCellParams::default();
    if let Some(style) = map.get("style") {
        params.style = serde_yaml::from_value(style.clone())?;
    }

    let n_height = parse_count(map, "height", idx)?;
    let n_width = parse_count(map, "width", idx)?;
    if n_height.is_some() || n_width.is_some() {
        params.extent = Some(SpecExtent::new(
            n_height.unwrap_or(1),
            n_width.unwrap_or(1),
        ));
    }

    if let Some(method) = map.get("write_method") {
        params.write_method = Some(serde_yaml::from_value(method.clone())?);
    }
    if let Some(text) = map.get("comment") {
        let c_text = text.as_str().ok_or_else(|| XlsxDrawError::ConfigShape {
            index: idx,
            reason: "`comment` must be a string".to_string(),
        })?;
        let options: SpecCommentOptions = match map.get("comment_params") {
            Some(node) => serde_yaml::from_value(node.clone())?,
            None => SpecCommentOptions::default(),
        };
        params.comment = Some(SpecCellComment::new(c_text).with_options(options));
    }
    if let Some(node) = map.get("col_width") {
        params.col_width = Some(match node {
            Value::String(s) if s == "auto" => EnumColumnWidth::Auto,
            Value::Number(n) if n.as_f64().is_some_and(|w| w >= 0.0) => {
                EnumColumnWidth::Fixed(n.as_f64().unwrap_or_default())
            }
            _ => {
                return Err(XlsxDrawError::ConfigShape {
                    index: idx,
                    reason: "`col_width` must be a non-negative number or \"auto\"".to_string(),
                });
            }
        });
    }
    Ok(params)
}

/// Non-negative count below the worksheet row limit.
fn parse_count(map: &Value, field: &str, idx: usize) -> DrawResult<Option<usize>> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(node) => node
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n < N_NROWS_EXCEL_MAX)
            .map(Some)
            .ok_or_else(|| XlsxDrawError::ConfigShape {
                index: idx,
                reason: format!(
                    "`{field}` must be a non-negative integer below {N_NROWS_EXCEL_MAX}"
                ),
            }),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::conf::derive_default_draw_formats;
    use crate::spec::EnumCellWrite;
    use crate::surface::SheetRecorder;

    const YAML_PROFILE: &str = r#"
- key: {value: Name, style: {bold: true}}
  value: {value: Alice, width: 2}
- key: {value: Tags}
  value:
    value: [a, {value: b, style: {italic: true}}]
  vspace: 1
- key: {value: Address}
  value:
    value:
      - key: {value: City}
        value: {value: Paris}
      - key: {value: Zip}
        value: {value: 75001}
"#;

    fn derive_profile_pairs() -> Vec<SpecDictPair> {
        let bold = SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        };
        let italic = SpecCellFormat {
            italic: Some(true),
            ..Default::default()
        };
        vec![
            SpecDictPair::new("Name", EnumDictValue::scalar("Alice"))
                .with_key_params(SpecDictCellParams {
                    style: bold,
                    ..Default::default()
                })
                .with_value_params(SpecDictCellParams {
                    extent: Some(SpecExtent::new(1, 2)),
                    ..Default::default()
                }),
            SpecDictPair::new(
                "Tags",
                EnumDictValue::List(vec![
                    EnumDictValue::scalar("a"),
                    EnumDictValue::Scalar(SpecDictCell::new("b").with_params(
                        SpecDictCellParams {
                            style: italic,
                            ..Default::default()
                        },
                    )),
                ]),
            )
            .with_vspace(1),
            SpecDictPair::new(
                "Address",
                EnumDictValue::Nested(vec![
                    SpecDictPair::new("City", EnumDictValue::scalar("Paris")),
                    SpecDictPair::new("Zip", EnumDictValue::scalar(75001)),
                ]),
            ),
        ]
    }

    #[test]
    fn test_yaml_and_in_memory_pairs_write_identically() {
        let from_yaml =
            Dictionary::from_yaml_str(YAML_PROFILE, SpecDictionaryOptions::default()).unwrap();
        let from_pairs = Dictionary::new(derive_profile_pairs(), SpecDictionaryOptions::default());
        assert_eq!(from_yaml, from_pairs);

        let mut recorder_yaml = SheetRecorder::new();
        Drawer::new(&mut recorder_yaml).draw(&from_yaml).unwrap();
        let mut recorder_pairs = SheetRecorder::new();
        Drawer::new(&mut recorder_pairs).draw(&from_pairs).unwrap();
        assert_eq!(recorder_yaml.ops(), recorder_pairs.ops());
    }

    #[test]
    fn test_layout_positions() {
        let dictionary = Dictionary::new(derive_profile_pairs(), SpecDictionaryOptions::default());
        // Name row 0; Tags rows 1-2 plus one blank; Address rows 4-5.
        assert_eq!(dictionary.extent(), SpecExtent::new(6, 5));

        let mut recorder = SheetRecorder::new();
        Drawer::new(&mut recorder).draw(&dictionary).unwrap();
        let text = |row, col| recorder.cell(row, col).map(|(write, _)| write.clone());

        assert_eq!(text(0, 0), Some(EnumCellWrite::String("Name".to_string())));
        assert_eq!(text(0, 2), Some(EnumCellWrite::String("Alice".to_string())));
        assert_eq!(text(1, 0), Some(EnumCellWrite::String("Tags".to_string())));
        assert_eq!(text(1, 2), Some(EnumCellWrite::String("a".to_string())));
        assert_eq!(text(2, 2), Some(EnumCellWrite::String("b".to_string())));
        assert_eq!(text(4, 0), Some(EnumCellWrite::String("Address".to_string())));
        assert_eq!(text(4, 2), Some(EnumCellWrite::String("City".to_string())));
        assert_eq!(text(4, 4), Some(EnumCellWrite::String("Paris".to_string())));
        assert_eq!(text(5, 4), Some(EnumCellWrite::Number(75001.0)));
        assert_eq!(recorder.merges().len(), 1);
        assert_eq!(recorder.cell(2, 2).unwrap().1.italic, Some(true));
    }

    #[test]
    fn test_default_params_come_from_presets() {
        let dict_fmt = derive_default_draw_formats();
        let options = SpecDictionaryOptions {
            key_params: SpecDictCellParams {
                style: dict_fmt["key"].clone(),
                ..Default::default()
            },
            value_params: SpecDictCellParams {
                style: dict_fmt["value"].clone(),
                ..Default::default()
            },
            hspace: 0,
            ..Default::default()
        };
        let dictionary = Dictionary::new(
            vec![SpecDictPair::new("k", EnumDictValue::scalar("v"))],
            options,
        );
        let mut recorder = SheetRecorder::new();
        Drawer::new(&mut recorder).draw(&dictionary).unwrap();
        assert_eq!(recorder.cell(0, 0).unwrap().1.bold, Some(true));
        assert_eq!(recorder.cell(0, 1).unwrap().1.text_wrap, Some(true));
    }

    #[test]
    fn test_missing_fields_fail_with_entry_index() {
        let doc = "- key: {value: a}\n  value: {value: 1}\n- key: {value: b}\n";
        let err = Dictionary::from_yaml_str(doc, SpecDictionaryOptions::default()).unwrap_err();
        assert!(matches!(err, XlsxDrawError::ConfigShape { index: 1, .. }));

        let doc = "- key: {style: {bold: true}}\n  value: {value: 1}\n";
        let err = Dictionary::from_yaml_str(doc, SpecDictionaryOptions::default()).unwrap_err();
        assert!(matches!(err, XlsxDrawError::ConfigShape { index: 0, .. }));

        let err = Dictionary::from_yaml_str("key: 1", SpecDictionaryOptions::default())
            .unwrap_err();
        assert!(matches!(err, XlsxDrawError::ConfigShape { .. }));

        let err = Dictionary::from_yaml_str("- [", SpecDictionaryOptions::default()).unwrap_err();
        assert!(matches!(err, XlsxDrawError::ConfigParse(_)));
    }

    #[test]
    fn test_nesting_deeper_than_limit_is_rejected() {
        let mut value = EnumDictValue::scalar("leaf");
        for _ in 0..=N_DICT_NESTING_DEPTH_MAX {
            value = EnumDictValue::Nested(vec![SpecDictPair::new("k", value)]);
        }
        let dictionary = Dictionary::new(
            vec![SpecDictPair::new("root", value)],
            SpecDictionaryOptions::default(),
        );
        assert_eq!(dictionary.depth(), N_DICT_NESTING_DEPTH_MAX + 1);

        let mut recorder = SheetRecorder::new();
        let err = Drawer::new(&mut recorder).draw(&dictionary).unwrap_err();
        assert!(matches!(err, XlsxDrawError::NestingTooDeep { .. }));
        assert!(recorder.ops().is_empty());
    }

    #[test]
    fn test_invalid_inner_cell_fails_before_any_write() {
        let doc = "- key: {value: a}\n  value: {value: 1}\n- key: {value: b, height: 0}\n  value: {value: 2}\n";
        let dictionary = Dictionary::from_yaml_str(doc, SpecDictionaryOptions::default()).unwrap();
        let mut recorder = SheetRecorder::new();
        let err = Drawer::new(&mut recorder).draw(&dictionary).unwrap_err();
        assert!(matches!(
            err,
            XlsxDrawError::InvalidExtent { row: 1, col: 0, height: 0, .. }
        ));
        assert!(recorder.ops().is_empty());

        let dictionary = Dictionary::new(
            vec![
                SpecDictPair::new("ok", EnumDictValue::scalar("v")),
                SpecDictPair::new(
                    "outer",
                    EnumDictValue::Nested(vec![SpecDictPair::new(
                        "inner",
                        EnumDictValue::List(vec![
                            EnumDictValue::scalar("x"),
                            EnumDictValue::Scalar(SpecDictCell::new("y").with_params(
                                SpecDictCellParams {
                                    extent: Some(SpecExtent::new(1, 0)),
                                    ..Default::default()
                                },
                            )),
                        ]),
                    )]),
                ),
            ],
            SpecDictionaryOptions::default(),
        );
        let mut recorder = SheetRecorder::new();
        let err = Drawer::new(&mut recorder).draw(&dictionary).unwrap_err();
        assert!(matches!(
            err,
            XlsxDrawError::InvalidExtent { row: 2, col: 4, .. }
        ));
        assert!(recorder.ops().is_empty());
    }

    #[test]
    fn test_oversized_extent_is_rejected_without_overflow() {
        let dictionary = Dictionary::new(
            vec![
                SpecDictPair::new("huge", EnumDictValue::scalar("v"))
                    .with_key_params(SpecDictCellParams {
                        extent: Some(SpecExtent::new(usize::MAX, 1)),
                        ..Default::default()
                    })
                    .with_vspace(1),
            ],
            SpecDictionaryOptions::default(),
        );
        assert_eq!(dictionary.extent().height, usize::MAX);

        let mut recorder = SheetRecorder::new();
        let err = Drawer::at(&mut recorder, SpecPosition::new(1, 0))
            .unwrap()
            .draw(&dictionary)
            .unwrap_err();
        assert!(matches!(err, XlsxDrawError::InvalidExtent { .. }));
        assert!(recorder.ops().is_empty());
    }

    #[test]
    fn test_counts_beyond_grid_are_rejected_at_load() {
        let doc = "- key: {value: a, height: 18446744073709551615}\n  value: {value: 1}\n  vspace: 1\n";
        let err = Dictionary::from_yaml_str(doc, SpecDictionaryOptions::default()).unwrap_err();
        assert!(matches!(err, XlsxDrawError::ConfigShape { index: 0, .. }));

        let doc = "- key: {value: a}\n  value: {value: 1}\n- key: {value: b}\n  value: {value: 2}\n  vspace: 1048576\n";
        let err = Dictionary::from_yaml_str(doc, SpecDictionaryOptions::default()).unwrap_err();
        assert!(matches!(err, XlsxDrawError::ConfigShape { index: 1, .. }));
    }

    #[test]
    fn test_unknown_style_field_is_a_parse_error() {
        let doc = "- key: {value: a, style: {bgcolor: \"#FF0000\"}}\n  value: {value: 1}\n";
        let err = Dictionary::from_yaml_str(doc, SpecDictionaryOptions::default()).unwrap_err();
        assert!(matches!(err, XlsxDrawError::ConfigParse(_)));
    }

    #[test]
    fn test_from_yaml_file_with_comment_and_write_method() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(
            file,
            "- key: {{value: Site, comment: homepage, comment_params: {{author: me}}}}\n  \
             value: {{value: \"https://example.com\", write_method: {{kind: url, text: Home}}, col_width: auto}}"
        )
        .expect("write doc");

        let dictionary =
            Dictionary::from_yaml_file(file.path(), SpecDictionaryOptions::default()).unwrap();
        let pair = &dictionary.pairs()[0];
        let comment = pair.key.params.comment.as_ref().unwrap();
        assert_eq!(comment.text, "homepage");
        assert_eq!(comment.options.author.as_deref(), Some("me"));
        assert_eq!(pair.value_params.col_width, Some(EnumColumnWidth::Auto));

        let mut recorder = SheetRecorder::new();
        Drawer::new(&mut recorder).draw(&dictionary).unwrap();
        assert!(matches!(
            recorder.cell(0, 2).unwrap().0,
            EnumCellWrite::Url { .. }
        ));
        assert_eq!(recorder.column_width(2), Some(8.0));
    }
}
