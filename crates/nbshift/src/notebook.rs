//! A notebook of either supported format version.

use crate::{v3, v4};

/// A notebook tagged with the format version it was read as.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionedNotebook {
    V3(v3::Notebook),
    V4(v4::Notebook),
}

impl VersionedNotebook {
    /// `(major, minor)` as recorded in the document.
    pub fn version(&self) -> (u32, u32) {
        match self {
            VersionedNotebook::V3(nb) => nb.version(),
            VersionedNotebook::V4(nb) => nb.version(),
        }
    }

    pub fn major(&self) -> u32 {
        self.version().0
    }

    /// Borrow the v4 notebook, if this is one.
    pub fn as_v4(&self) -> Option<&v4::Notebook> {
        match self {
            VersionedNotebook::V4(nb) => Some(nb),
            VersionedNotebook::V3(_) => None,
        }
    }

    /// Borrow the v3 notebook, if this is one.
    pub fn as_v3(&self) -> Option<&v3::Notebook> {
        match self {
            VersionedNotebook::V3(nb) => Some(nb),
            VersionedNotebook::V4(_) => None,
        }
    }
}

impl From<v3::Notebook> for VersionedNotebook {
    fn from(nb: v3::Notebook) -> Self {
        VersionedNotebook::V3(nb)
    }
}

impl From<v4::Notebook> for VersionedNotebook {
    fn from(nb: v4::Notebook) -> Self {
        VersionedNotebook::V4(nb)
    }
}
