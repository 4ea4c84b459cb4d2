//! Notebook version conversion.
//!
//! [`Converter`] carries the conversion options; the free functions at the
//! bottom of this module use [`ConvertOptions::default`].

mod cells;
mod outputs;

pub use cells::downgrade_cell_with_language;
pub use outputs::{downgrade_output, downgrade_outputs, upgrade_output, upgrade_outputs};

use rustc_hash::FxHashSet;
use serde_json::{Map, Value};

use crate::check::{self, Issue};
use crate::error::{ConversionError, ConversionResult};
use crate::notebook::VersionedNotebook;
use crate::{v3, v4};

/// How upgraded cells get their `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellIdStrategy {
    /// Eight hex characters from a random UUID.
    #[default]
    Random,
    /// `cell-0`, `cell-1`, ... counted per notebook.
    Sequential,
}

/// Options for notebook conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Language given to v3 code cells when the notebook metadata names none.
    pub default_language: String,

    /// Id assignment for cells that need one.
    pub cell_ids: CellIdStrategy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            default_language: v3::DEFAULT_LANGUAGE.to_string(),
            cell_ids: CellIdStrategy::Random,
        }
    }
}

impl ConvertOptions {
    /// Options producing identical output for identical input.
    pub fn reproducible() -> Self {
        Self {
            cell_ids: CellIdStrategy::Sequential,
            ..Default::default()
        }
    }
}

/// Converter between nbformat v3 and v4.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,

    /// Counter for sequential cell ids
    next_id: usize,
}

impl Converter {
    /// Create a converter with the given options.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            next_id: 0,
        }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Upgrade a notebook to the latest v4 minor version.
    ///
    /// The source version is the one the document records. A notebook that
    /// is already v4.5 is returned unchanged.
    pub fn upgrade(&mut self, notebook: VersionedNotebook) -> ConversionResult<v4::Notebook> {
        match notebook {
            VersionedNotebook::V3(nb) => self.upgrade_v3(nb),
            VersionedNotebook::V4(nb) => self.upgrade_v4_minor(nb),
        }
    }

    /// Downgrade a v4 notebook to v3.0.
    ///
    /// Cell ids and attachments are dropped. Code cells take their language
    /// from `language_info.name`, then `kernelspec.language`, then the
    /// configured default.
    pub fn downgrade(&self, notebook: v4::Notebook) -> ConversionResult<v3::Notebook> {
        let version = notebook.version();
        if version.0 != v4::NBFORMAT || version.1 > v4::NBFORMAT_MINOR {
            return Err(ConversionError::unsupported(version));
        }
        warn_issues(check::check_v4(&notebook), version);

        let v4::Notebook {
            mut metadata,
            cells,
            nbformat_minor,
            ..
        } = notebook;

        let language = notebook_language(&metadata)
            .unwrap_or(self.options.default_language.as_str())
            .to_string();

        let cells = cells
            .into_iter()
            .map(|cell| downgrade_cell_with_language(cell, &language))
            .collect::<ConversionResult<Vec<_>>>()?;

        let orig_nbformat =
            take_version_field(&mut metadata, "orig_nbformat").unwrap_or(v4::NBFORMAT);
        let orig_nbformat_minor =
            take_version_field(&mut metadata, "orig_nbformat_minor").unwrap_or(nbformat_minor);
        metadata
            .entry("name")
            .or_insert_with(|| Value::String(String::new()));

        let downgraded = v3::Notebook {
            metadata,
            nbformat: v3::NBFORMAT,
            nbformat_minor: v3::NBFORMAT_MINOR,
            worksheets: vec![v3::Worksheet {
                cells,
                metadata: Map::new(),
            }],
            orig_nbformat: Some(orig_nbformat),
            orig_nbformat_minor: Some(orig_nbformat_minor),
        };
        warn_issues(check::check_v3(&downgraded), downgraded.version());

        tracing::debug!(
            "Downgraded v{}.{} notebook ({} cells)",
            version.0,
            version.1,
            downgraded.worksheets[0].cells.len()
        );
        Ok(downgraded)
    }

    fn upgrade_v3(&mut self, notebook: v3::Notebook) -> ConversionResult<v4::Notebook> {
        let version = notebook.version();
        if version != (v3::NBFORMAT, v3::NBFORMAT_MINOR) {
            return Err(ConversionError::unsupported(version));
        }
        warn_issues(check::check_v3(&notebook), version);

        let v3::Notebook {
            mut metadata,
            worksheets,
            orig_nbformat,
            orig_nbformat_minor,
            ..
        } = notebook;

        if worksheets.len() > 1 {
            tracing::debug!("Flattening {} worksheets into one cell list", worksheets.len());
        }

        self.next_id = 0;
        let cells = worksheets
            .into_iter()
            .flat_map(|ws| ws.cells)
            .map(|cell| self.upgrade_cell(cell))
            .collect::<ConversionResult<Vec<_>>>()?;

        // v4 keeps the notebook name in the file name.
        metadata.remove("name");
        metadata.remove("signature");
        metadata.insert(
            "orig_nbformat".to_string(),
            Value::from(orig_nbformat.unwrap_or(v3::NBFORMAT)),
        );
        metadata.insert(
            "orig_nbformat_minor".to_string(),
            Value::from(orig_nbformat_minor.unwrap_or(v3::NBFORMAT_MINOR)),
        );

        let upgraded = v4::Notebook {
            metadata,
            nbformat: v4::NBFORMAT,
            nbformat_minor: v4::NBFORMAT_MINOR,
            cells,
        };
        warn_issues(check::check_v4(&upgraded), upgraded.version());

        tracing::debug!("Upgraded v3 notebook ({} cells)", upgraded.cells.len());
        Ok(upgraded)
    }

    fn upgrade_v4_minor(&mut self, mut notebook: v4::Notebook) -> ConversionResult<v4::Notebook> {
        let version = notebook.version();
        if version.0 != v4::NBFORMAT || version.1 > v4::NBFORMAT_MINOR {
            return Err(ConversionError::unsupported(version));
        }
        if version.1 == v4::NBFORMAT_MINOR {
            return Ok(notebook);
        }

        if version.1 < v4::CELL_ID_MINOR {
            self.next_id = 0;
            let mut taken: FxHashSet<String> = notebook
                .cells
                .iter()
                .filter_map(|cell| cell.id().map(str::to_string))
                .collect();

            for cell in &mut notebook.cells {
                if cell.id().is_none() {
                    let id = loop {
                        let candidate = self.next_cell_id();
                        if !taken.contains(&candidate) {
                            break candidate;
                        }
                    };
                    taken.insert(id.clone());
                    cell.set_id(id);
                }
            }
        }

        notebook
            .metadata
            .insert("orig_nbformat_minor".to_string(), Value::from(version.1));
        notebook.nbformat_minor = v4::NBFORMAT_MINOR;

        tracing::debug!("Upgraded v4.{} notebook to v4.{}", version.1, v4::NBFORMAT_MINOR);
        Ok(notebook)
    }

    fn next_cell_id(&mut self) -> String {
        match self.options.cell_ids {
            CellIdStrategy::Random => random_cell_id(),
            CellIdStrategy::Sequential => {
                let id = format!("cell-{}", self.next_id);
                self.next_id += 1;
                id
            }
        }
    }
}

/// Generate a random cell id (8 hex characters).
pub fn random_cell_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Language named by notebook metadata, if any.
pub fn notebook_language(metadata: &Map<String, Value>) -> Option<&str> {
    metadata
        .get("language_info")
        .and_then(|info| info.get("name"))
        .and_then(Value::as_str)
        .or_else(|| {
            metadata
                .get("kernelspec")
                .and_then(|spec| spec.get("language"))
                .and_then(Value::as_str)
        })
}

fn take_version_field(metadata: &mut Map<String, Value>, key: &str) -> Option<u32> {
    metadata
        .remove(key)
        .and_then(|value| value.as_u64())
        .and_then(|n| u32::try_from(n).ok())
}

fn warn_issues(issues: Vec<Issue>, (major, minor): (u32, u32)) {
    for issue in issues {
        tracing::warn!("v{}.{} notebook: {}", major, minor, issue);
    }
}

/// Upgrade a notebook to v4 with default options.
pub fn upgrade(notebook: impl Into<VersionedNotebook>) -> ConversionResult<v4::Notebook> {
    Converter::default().upgrade(notebook.into())
}

/// Downgrade a v4 notebook to v3 with default options.
pub fn downgrade(notebook: v4::Notebook) -> ConversionResult<v3::Notebook> {
    Converter::default().downgrade(notebook)
}

/// Upgrade a single cell with default options.
pub fn upgrade_cell(cell: v3::Cell) -> ConversionResult<v4::Cell> {
    Converter::default().upgrade_cell(cell)
}

/// Downgrade a single cell, assuming the default language.
pub fn downgrade_cell(cell: v4::Cell) -> ConversionResult<v3::Cell> {
    downgrade_cell_with_language(cell, v3::DEFAULT_LANGUAGE)
}

/// Convert a notebook to the given major version.
///
/// Converting to the version the notebook already has upgrades v4 notebooks
/// to the latest minor and leaves v3 notebooks untouched.
pub fn convert(notebook: VersionedNotebook, to_major: u32) -> ConversionResult<VersionedNotebook> {
    Converter::default().convert(notebook, to_major)
}

impl Converter {
    /// Convert a notebook to the given major version.
    pub fn convert(
        &mut self,
        notebook: VersionedNotebook,
        to_major: u32,
    ) -> ConversionResult<VersionedNotebook> {
        match (notebook, to_major) {
            (VersionedNotebook::V3(nb), v3::NBFORMAT) => {
                let version = nb.version();
                if version != (v3::NBFORMAT, v3::NBFORMAT_MINOR) {
                    return Err(ConversionError::unsupported(version));
                }
                Ok(VersionedNotebook::V3(nb))
            }
            (notebook, v4::NBFORMAT) => self.upgrade(notebook).map(VersionedNotebook::V4),
            (VersionedNotebook::V4(nb), v3::NBFORMAT) => self.downgrade(nb).map(VersionedNotebook::V3),
            (_, other) => Err(ConversionError::UnsupportedVersion {
                major: other,
                minor: 0,
            }),
        }
    }
}
