//! Jupyter notebook format conversion between nbformat v3 and v4.
//!
//! # Architecture
//!
//! ```text
//! notebook.ipynb ──► io::reads ──► VersionedNotebook ──► Converter ──► io::writes ──► notebook.v4.ipynb
//!                     (rejoin        ├── V3(v3::Notebook)   │  upgrade / downgrade
//!                      lines)        └── V4(v4::Notebook)   │  cells, outputs, MIME keys
//!                                                           ▼
//!                                                        check (warnings)
//! ```
//!
//! The conversion functions are pure: they consume a notebook and build a new
//! one. Reading and writing files is kept in [`io`].

pub mod check;
pub mod convert;
mod error;
pub mod io;
mod kind;
pub mod mime;
mod notebook;
pub mod v3;
pub mod v4;

pub use convert::{
    CellIdStrategy, ConvertOptions, Converter, convert, downgrade, downgrade_cell,
    downgrade_cell_with_language, downgrade_output, downgrade_outputs, upgrade, upgrade_cell,
    upgrade_output, upgrade_outputs,
};
pub use error::{ConversionError, ConversionResult};
pub use kind::{CellKind, OutputKind};
pub use mime::{MimeBundle, from_mime_key, to_mime_key};
pub use notebook::VersionedNotebook;

use std::path::{Path, PathBuf};

/// Convert a notebook file to the given major version and write the result.
///
/// Returns the converted notebook.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    converter: &mut Converter,
    to_major: u32,
) -> ConversionResult<VersionedNotebook> {
    let input = input.as_ref();
    let output = output.as_ref();

    let notebook = io::read_file(input)?;
    let (major, minor) = notebook.version();

    let converted = converter.convert(notebook, to_major)?;
    io::write_file(output, &converted)?;

    let (to_major, to_minor) = converted.version();
    tracing::info!(
        "Converted {} (v{}.{}) → {} (v{}.{})",
        input.display(),
        major,
        minor,
        output.display(),
        to_major,
        to_minor
    );

    Ok(converted)
}

/// Get the default output path for a notebook converted to `major`.
///
/// `analysis.ipynb` becomes `analysis.v4.ipynb`.
pub fn default_output_path(input: impl AsRef<Path>, major: u32) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}.v{}.ipynb", stem, major))
}
