//! Cell and output kinds shared by both format versions.

use std::fmt;

/// Kind of a cell in either format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellKind {
    /// Code cell
    Code,
    /// Markdown cell
    Markdown,
    /// Raw cell
    Raw,
    /// Heading cell (v3 only)
    Heading,
    /// Legacy HTML cell (v3 only)
    Html,
}

impl CellKind {
    /// Name used in the `cell_type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            CellKind::Code => "code",
            CellKind::Markdown => "markdown",
            CellKind::Raw => "raw",
            CellKind::Heading => "heading",
            CellKind::Html => "html",
        }
    }

    /// Whether a v4 document can hold this kind directly.
    pub fn exists_in_v4(self) -> bool {
        matches!(self, CellKind::Code | CellKind::Markdown | CellKind::Raw)
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a code cell output.
///
/// Every kind has exactly one name in each format version, which is what
/// makes output conversion a bijection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputKind {
    /// `execute_result` in v4, `pyout` in v3
    ExecuteResult,
    /// `display_data` in both versions
    DisplayData,
    /// `stream` in both versions
    Stream,
    /// `error` in v4, `pyerr` in v3
    Error,
}

impl OutputKind {
    pub const ALL: [OutputKind; 4] = [
        OutputKind::ExecuteResult,
        OutputKind::DisplayData,
        OutputKind::Stream,
        OutputKind::Error,
    ];

    /// Name used in the v4 `output_type` field.
    pub fn v4_name(self) -> &'static str {
        match self {
            OutputKind::ExecuteResult => "execute_result",
            OutputKind::DisplayData => "display_data",
            OutputKind::Stream => "stream",
            OutputKind::Error => "error",
        }
    }

    /// Name used in the v3 `output_type` field.
    pub fn v3_name(self) -> &'static str {
        match self {
            OutputKind::ExecuteResult => "pyout",
            OutputKind::DisplayData => "display_data",
            OutputKind::Stream => "stream",
            OutputKind::Error => "pyerr",
        }
    }

    pub fn from_v4_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.v4_name() == name)
    }

    pub fn from_v3_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.v3_name() == name)
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.v4_name())
    }
}
