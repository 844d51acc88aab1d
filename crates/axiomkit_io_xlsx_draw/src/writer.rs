//! Workbook writer that hands out drawers bound to worksheets.

use std::collections::BTreeSet;
use std::path::PathBuf;

use log::{info, warn};
use rust_xlsxwriter::Workbook;

use crate::conf::N_LEN_EXCEL_SHEET_NAME_MAX;
use crate::drawer::Drawer;
use crate::error::{DrawResult, XlsxDrawError};
use crate::util::sanitize_sheet_name;

/// Stateful workbook writer.
pub struct XlsxDrawWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    na_rep: String,
    set_sheet_names_existing: BTreeSet<String>,
    l_sheet_names: Vec<String>,
    if_closed: bool,
}

impl XlsxDrawWriter {
    /// Create writer bound to an output path.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(path_file_out: impl Into<PathBuf>) -> Self {
        Self {
            path_file_out: path_file_out.into(),
            workbook: Workbook::new(),
            na_rep: String::new(),
            set_sheet_names_existing: BTreeSet::new(),
            l_sheet_names: Vec::new(),
            if_closed: false,
        }
    }

    /// Text written for missing values by every drawer handed out.
    pub fn with_na_rep(mut self, na_rep: impl Into<String>) -> Self {
        self.na_rep = na_rep.into();
        self
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Final sheet names in creation order.
    pub fn sheet_names(&self) -> &[String] {
        &self.l_sheet_names
    }

    pub fn is_closed(&self) -> bool {
        self.if_closed
    }

    /// Add a worksheet and return a drawer at its `A1`.
    ///
    /// Invalid characters are replaced and duplicate names get a `__N` suffix.
    pub fn add_sheet(&mut self, sheet_name: &str) -> DrawResult<Drawer<'_>> {
        if self.if_closed {
            return Err(XlsxDrawError::WriterClosed);
        }
        let c_name_sanitized = sanitize_sheet_name(sheet_name, "_");
        let c_name = self.derive_unique_sheet_name(&c_name_sanitized);
        if c_name != sheet_name {
            warn!(requested = sheet_name, used = c_name.as_str(); "Sheet name adjusted");
        }
        info!(sheet = c_name.as_str(); "Adding worksheet");
        self.l_sheet_names.push(c_name.clone());

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(c_name)?;
        Ok(Drawer::new(worksheet).with_na_rep(self.na_rep.as_str()))
    }

    /// Drawer at `A1` of a sheet added earlier.
    pub fn sheet(&mut self, sheet_name: &str) -> DrawResult<Drawer<'_>> {
        if self.if_closed {
            return Err(XlsxDrawError::WriterClosed);
        }
        let worksheet = self.workbook.worksheet_from_name(sheet_name)?;
        Ok(Drawer::new(worksheet).with_na_rep(self.na_rep.as_str()))
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> DrawResult<()> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook.save(&self.path_file_out)?;
        self.if_closed = true;
        info!(
            path = self.file_out().as_str(),
            n_sheets = self.l_sheet_names.len();
            "Saved workbook"
        );
        Ok(())
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        // Excel compares sheet names case-insensitively.
        if self.set_sheet_names_existing.insert(name.to_lowercase()) {
            return name.to_string();
        }

        let base_name: String = name
            .chars()
            .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
            .collect();

        let mut n_idx = 2usize;
        loop {
            let candidate: String = format!("{base_name}__{n_idx}")
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX)
                .collect();
            if self.set_sheet_names_existing.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n_idx += 1;
        }
    }
}
