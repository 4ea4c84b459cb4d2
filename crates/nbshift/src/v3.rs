//! nbformat v3 document model.
//!
//! v3 groups cells into worksheets, has a dedicated `heading` cell, and
//! stores output payloads directly on the output object under short aliases
//! such as `text` or `png`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::kind::{CellKind, OutputKind};
use crate::mime::MimeBundle;

/// Major format version.
pub const NBFORMAT: u32 = 3;

/// The only minor version v3 ever had.
pub const NBFORMAT_MINOR: u32 = 0;

/// Language assumed for code cells when nothing says otherwise.
pub const DEFAULT_LANGUAGE: &str = "python";

/// Deepest heading level a heading cell can have.
pub const MAX_HEADING_LEVEL: u32 = 6;

/// A v3 notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Notebook metadata (`name`, `signature`, ...)
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Format version (always 3)
    pub nbformat: u32,

    /// Minor format version
    pub nbformat_minor: u32,

    /// Worksheets, each holding a run of cells
    #[serde(default)]
    pub worksheets: Vec<Worksheet>,

    /// Major version this document was converted from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_nbformat: Option<u32>,

    /// Minor version this document was converted from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_nbformat_minor: Option<u32>,
}

/// A group of cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    #[serde(default)]
    pub cells: Vec<Cell>,

    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// A v3 cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    /// Executable code with its outputs.
    Code {
        #[serde(default = "default_language")]
        language: String,
        #[serde(default)]
        input: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        collapsed: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt_number: Option<u32>,
        #[serde(default)]
        outputs: Vec<Output>,
        #[serde(default)]
        metadata: Map<String, Value>,
    },

    /// Markdown prose.
    Markdown {
        #[serde(default)]
        source: String,
        #[serde(default)]
        metadata: Map<String, Value>,
    },

    /// Section heading.
    Heading {
        #[serde(default)]
        source: String,
        #[serde(default = "default_level")]
        level: u32,
        #[serde(default)]
        metadata: Map<String, Value>,
    },

    /// Raw text.
    Raw {
        #[serde(default)]
        source: String,
        #[serde(default)]
        metadata: Map<String, Value>,
    },

    /// Legacy HTML cell.
    Html {
        #[serde(default)]
        source: String,
        #[serde(default)]
        metadata: Map<String, Value>,
    },
}

/// A v3 code cell output.
///
/// Payloads of `pyout` and `display_data` sit next to the other fields,
/// keyed by alias (`text`, `html`, `png`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    /// Value of the last expression in a cell
    Pyout {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt_number: Option<u32>,
        #[serde(default)]
        metadata: Map<String, Value>,
        #[serde(flatten)]
        data: MimeBundle,
    },

    /// Rich display data
    DisplayData {
        #[serde(default)]
        metadata: Map<String, Value>,
        #[serde(flatten)]
        data: MimeBundle,
    },

    /// Standard output/error
    Stream {
        #[serde(default = "default_stream")]
        stream: String,
        #[serde(default)]
        text: String,
    },

    /// Error output
    Pyerr {
        ename: String,
        evalue: String,
        #[serde(default)]
        traceback: Vec<String>,
    },
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_level() -> u32 {
    1
}

fn default_stream() -> String {
    "stdout".to_string()
}

impl Notebook {
    /// Create an empty v3.0 notebook with a single worksheet.
    pub fn new() -> Self {
        Self {
            metadata: Map::new(),
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
            worksheets: vec![Worksheet::default()],
            orig_nbformat: None,
            orig_nbformat_minor: None,
        }
    }

    /// `(major, minor)` as recorded in the document.
    pub fn version(&self) -> (u32, u32) {
        (self.nbformat, self.nbformat_minor)
    }

    /// All cells across worksheets, in document order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.worksheets.iter().flat_map(|ws| ws.cells.iter())
    }
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new()
    }
}

impl Cell {
    /// Create a code cell in the default language.
    pub fn code(input: impl Into<String>) -> Self {
        Cell::Code {
            language: default_language(),
            input: input.into(),
            collapsed: None,
            prompt_number: None,
            outputs: Vec::new(),
            metadata: Map::new(),
        }
    }

    pub fn markdown(source: impl Into<String>) -> Self {
        Cell::Markdown {
            source: source.into(),
            metadata: Map::new(),
        }
    }

    pub fn heading(level: u32, source: impl Into<String>) -> Self {
        Cell::Heading {
            source: source.into(),
            level,
            metadata: Map::new(),
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Code { .. } => CellKind::Code,
            Cell::Markdown { .. } => CellKind::Markdown,
            Cell::Heading { .. } => CellKind::Heading,
            Cell::Raw { .. } => CellKind::Raw,
            Cell::Html { .. } => CellKind::Html,
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
            Output::Pyout { .. } => OutputKind::ExecuteResult,
            Output::DisplayData { .. } => OutputKind::DisplayData,
            Output::Stream { .. } => OutputKind::Stream,
            Output::Pyerr { .. } => OutputKind::Error,
        }
    }
}
