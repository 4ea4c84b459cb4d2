//! Structural checks on notebooks.
//!
//! These catch the problems Jupyter itself would complain about when opening
//! a file. Conversion logs them as warnings and carries on.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::v3::MAX_HEADING_LEVEL;
use crate::{v3, v4};

/// Longest cell id nbformat accepts.
pub const MAX_CELL_ID_LEN: usize = 64;

/// A structural problem found in a notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Index of the offending cell in document order, if the issue is cell-level
    pub cell_index: Option<usize>,

    /// Human-readable description
    pub message: String,
}

impl Issue {
    fn cell(index: usize, message: impl Into<String>) -> Self {
        Self {
            cell_index: Some(index),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell_index {
            Some(index) => write!(f, "cell {}: {}", index, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Check a v4 notebook. Cell ids are required from v4.5 on.
pub fn check_v4(notebook: &v4::Notebook) -> Vec<Issue> {
    let ids_required = notebook.nbformat_minor >= v4::CELL_ID_MINOR;
    let mut seen = FxHashSet::default();
    let mut issues = Vec::new();

    for (index, cell) in notebook.cells.iter().enumerate() {
        match cell.id() {
            None if ids_required => issues.push(Issue::cell(index, "missing cell id")),
            None => {}
            Some(id) => {
                if !is_valid_cell_id(id) {
                    issues.push(Issue::cell(index, format!("invalid cell id {:?}", id)));
                }
                if !seen.insert(id) {
                    issues.push(Issue::cell(index, format!("duplicate cell id {:?}", id)));
                }
            }
        }
    }

    issues
}

/// Check a v3 notebook.
pub fn check_v3(notebook: &v3::Notebook) -> Vec<Issue> {
    let mut issues = Vec::new();

    if notebook.worksheets.is_empty() {
        issues.push(Issue {
            cell_index: None,
            message: "notebook has no worksheets".to_string(),
        });
    }

    for (index, cell) in notebook.cells().enumerate() {
        if let v3::Cell::Heading { level, .. } = cell
            && !(1..=MAX_HEADING_LEVEL).contains(level)
        {
            issues.push(Issue::cell(
                index,
                format!("heading level {} outside 1..={}", level, MAX_HEADING_LEVEL),
            ));
        }
    }

    issues
}

/// Whether `id` matches `^[a-zA-Z0-9-_]{1,64}$`.
pub fn is_valid_cell_id(id: &str) -> bool {
    (1..=MAX_CELL_ID_LEN).contains(&id.len())
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cell_ids() {
        assert!(is_valid_cell_id("a1b2c3d4"));
        assert!(is_valid_cell_id("cell-0_x"));
        assert!(!is_valid_cell_id(""));
        assert!(!is_valid_cell_id("has space"));
        assert!(!is_valid_cell_id(&"x".repeat(65)));
    }

    #[test]
    fn test_check_v4_ids() {
        let mut nb = v4::Notebook::new();
        nb.cells.push(v4::Cell::code("a"));
        nb.cells.push(v4::Cell::code("b"));
        nb.cells.push(v4::Cell::code("c"));
        nb.cells[1].set_id("same");
        nb.cells[2].set_id("same");

        let issues = check_v4(&nb);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].cell_index, Some(0));
        assert!(issues[0].message.contains("missing"));
        assert!(issues[1].to_string().starts_with("cell 2: duplicate"));
    }

    #[test]
    fn test_check_v4_ids_optional_before_minor_5() {
        let mut nb = v4::Notebook::new();
        nb.nbformat_minor = 4;
        nb.cells.push(v4::Cell::markdown("a"));
        assert!(check_v4(&nb).is_empty());
    }

    #[test]
    fn test_check_v3_heading_levels() {
        let mut nb = v3::Notebook::new();
        nb.worksheets[0].cells.push(v3::Cell::heading(3, "ok"));
        nb.worksheets[0].cells.push(v3::Cell::heading(9, "deep"));

        let issues = check_v3(&nb);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].cell_index, Some(1));
    }
}
