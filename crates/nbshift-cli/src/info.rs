//! Info command implementation.
//!
//! Prints a notebook's format version, cell and output counts, and any
//! structural issues.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use nbshift::check::{self, Issue};
use nbshift::convert::notebook_language;
use nbshift::{CellKind, OutputKind, VersionedNotebook, io, v3};

use crate::colors;

/// What `info` reports about a notebook.
#[derive(Debug)]
pub struct Summary {
    pub version: (u32, u32),
    pub language: Option<String>,
    pub cells: BTreeMap<CellKind, usize>,
    pub outputs: BTreeMap<OutputKind, usize>,
    pub issues: Vec<Issue>,
}

impl Summary {
    pub fn of(notebook: &VersionedNotebook) -> Self {
        let mut cells = BTreeMap::new();
        let mut outputs = BTreeMap::new();

        let (language, issues) = match notebook {
            VersionedNotebook::V3(nb) => {
                for cell in nb.cells() {
                    *cells.entry(cell.kind()).or_insert(0) += 1;
                    for output in cell.outputs() {
                        *outputs.entry(output.kind()).or_insert(0) += 1;
                    }
                }
                let language = nb.cells().find_map(|cell| match cell {
                    v3::Cell::Code { language, .. } => Some(language.clone()),
                    _ => None,
                });
                (language, check::check_v3(nb))
            }
            VersionedNotebook::V4(nb) => {
                for cell in &nb.cells {
                    *cells.entry(cell.kind()).or_insert(0) += 1;
                    for output in cell.outputs() {
                        *outputs.entry(output.kind()).or_insert(0) += 1;
                    }
                }
                let language = notebook_language(&nb.metadata).map(str::to_string);
                (language, check::check_v4(nb))
            }
        };

        Self {
            version: notebook.version(),
            language,
            cells,
            outputs,
            issues,
        }
    }

    /// Output counts named the way this notebook's version names them.
    fn output_breakdown(&self) -> String {
        let is_v3 = self.version.0 == v3::NBFORMAT;
        breakdown(self.outputs.iter().map(|(kind, count)| {
            let name = if is_v3 { kind.v3_name() } else { kind.v4_name() };
            (name, *count)
        }))
    }

    fn cell_breakdown(&self) -> String {
        breakdown(
            self.cells
                .iter()
                .map(|(kind, count)| (kind.as_str(), *count)),
        )
    }
}

fn breakdown<'a>(counts: impl Iterator<Item = (&'a str, usize)>) -> String {
    let parts: Vec<_> = counts
        .map(|(name, count)| format!("{}: {}", name, count))
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

/// Execute the info command.
pub fn execute(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("Notebook not found: {}", path.display());
    }

    let notebook =
        io::read_file(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let summary = Summary::of(&notebook);

    println!("\n{}{}{}", colors::BOLD, path.display(), colors::RESET);
    println!("{}", "─".repeat(50));
    println!(
        "  Format:    v{}.{}",
        summary.version.0, summary.version.1
    );
    println!(
        "  Language:  {}",
        summary.language.as_deref().unwrap_or("unknown")
    );
    println!(
        "  Cells:     {}{}",
        summary.cells.values().sum::<usize>(),
        summary.cell_breakdown()
    );
    println!(
        "  Outputs:   {}{}",
        summary.outputs.values().sum::<usize>(),
        summary.output_breakdown()
    );

    if summary.issues.is_empty() {
        println!("  Issues:    {}none{}", colors::GREEN, colors::RESET);
    } else {
        println!("  Issues:    {}", summary.issues.len());
        for issue in &summary.issues {
            println!("    {}!{} {}", colors::YELLOW, colors::RESET, issue);
        }
    }

    Ok(())
}
