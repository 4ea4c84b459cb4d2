//! nbformat v4 document model.
//!
//! Cells live in a flat list, outputs nest their payloads in a `data` bundle
//! keyed by MIME type, and from minor version 5 every cell carries an `id`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::kind::{CellKind, OutputKind};
use crate::mime::MimeBundle;

/// Major format version.
pub const NBFORMAT: u32 = 4;

/// Latest minor format version.
pub const NBFORMAT_MINOR: u32 = 5;

/// First minor version that requires cell ids.
pub const CELL_ID_MINOR: u32 = 5;

/// A v4 notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Notebook metadata (kernelspec, language_info, ...)
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Format version (always 4)
    pub nbformat: u32,

    /// Minor format version
    pub nbformat_minor: u32,

    /// Notebook cells
    #[serde(default)]
    pub cells: Vec<Cell>,
}

/// A v4 cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    /// Executable code with its outputs.
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default)]
        metadata: Map<String, Value>,
        #[serde(default)]
        source: String,
        #[serde(default)]
        execution_count: Option<u32>,
        #[serde(default)]
        outputs: Vec<Output>,
    },

    /// Markdown prose.
    Markdown {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default)]
        metadata: Map<String, Value>,
        #[serde(default)]
        source: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attachments: Option<Map<String, Value>>,
    },

    /// Raw text passed through untouched by renderers.
    Raw {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default)]
        metadata: Map<String, Value>,
        #[serde(default)]
        source: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attachments: Option<Map<String, Value>>,
    },
}

/// A v4 code cell output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    /// Value of the last expression in a cell
    ExecuteResult {
        #[serde(default)]
        execution_count: Option<u32>,
        #[serde(default)]
        data: MimeBundle,
        #[serde(default)]
        metadata: Map<String, Value>,
    },

    /// Rich display data
    DisplayData {
        #[serde(default)]
        data: MimeBundle,
        #[serde(default)]
        metadata: Map<String, Value>,
    },

    /// Standard output/error
    Stream {
        name: String,
        #[serde(default)]
        text: String,
    },

    /// Error output
    Error {
        ename: String,
        evalue: String,
        #[serde(default)]
        traceback: Vec<String>,
    },
}

impl Notebook {
    /// Create a new empty notebook at the latest minor version.
    pub fn new() -> Self {
        Self {
            metadata: Map::new(),
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
            cells: Vec::new(),
        }
    }

    /// `(major, minor)` as recorded in the document.
    pub fn version(&self) -> (u32, u32) {
        (self.nbformat, self.nbformat_minor)
    }
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new()
    }
}

impl Cell {
    /// Create a code cell with no outputs.
    pub fn code(source: impl Into<String>) -> Self {
        Cell::Code {
            id: None,
            metadata: Map::new(),
            source: source.into(),
            execution_count: None,
            outputs: Vec::new(),
        }
    }

    /// Create a markdown cell.
    pub fn markdown(source: impl Into<String>) -> Self {
        Cell::Markdown {
            id: None,
            metadata: Map::new(),
            source: source.into(),
            attachments: None,
        }
    }

    /// Create a raw cell.
    pub fn raw(source: impl Into<String>) -> Self {
        Cell::Raw {
            id: None,
            metadata: Map::new(),
            source: source.into(),
            attachments: None,
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Code { .. } => CellKind::Code,
            Cell::Markdown { .. } => CellKind::Markdown,
            Cell::Raw { .. } => CellKind::Raw,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Cell::Code { id, .. } | Cell::Markdown { id, .. } | Cell::Raw { id, .. } => {
                id.as_deref()
            }
        }
    }

    pub fn set_id(&mut self, new_id: impl Into<String>) {
        match self {
            Cell::Code { id, .. } | Cell::Markdown { id, .. } | Cell::Raw { id, .. } => {
                *id = Some(new_id.into());
            }
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Cell::Code { source, .. } | Cell::Markdown { source, .. } | Cell::Raw { source, .. } => {
                source
            }
        }
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        match self {
            Cell::Code { metadata, .. }
            | Cell::Markdown { metadata, .. }
            | Cell::Raw { metadata, .. } => metadata,
        }
    }

    /// Outputs of a code cell; empty for other kinds.
    pub fn outputs(&self) -> &[Output] {
        match self {
            Cell::Code { outputs, .. } => outputs,
            _ => &[],
        }
    }
}

impl Output {
    pub fn kind(&self) -> OutputKind {
        match self {
            Output::ExecuteResult { .. } => OutputKind::ExecuteResult,
            Output::DisplayData { .. } => OutputKind::DisplayData,
            Output::Stream { .. } => OutputKind::Stream,
            Output::Error { .. } => OutputKind::Error,
        }
    }

    /// Create a `stream` output.
    pub fn stream(name: impl Into<String>, text: impl Into<String>) -> Self {
        Output::Stream {
            name: name.into(),
            text: text.into(),
        }
    }
}
