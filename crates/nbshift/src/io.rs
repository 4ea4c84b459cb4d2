//! Reading and writing `.ipynb` JSON.
//!
//! On disk, Jupyter stores multi-line text as a list of lines. In memory we
//! keep a single string. [`reads`] rejoins the lines before deserializing and
//! [`writes`] splits them again, following the same per-version rules as
//! Jupyter so files round-trip without noisy diffs.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::{ConversionError, ConversionResult};
use crate::mime::{is_binary_key, is_json_key};
use crate::notebook::VersionedNotebook;
use crate::{v3, v4};

/// v3 output keys holding multi-line text.
const V3_MULTILINE_OUTPUTS: [&str; 6] = ["text", "html", "svg", "latex", "javascript", "json"];

/// Parse a notebook of any supported version from JSON text.
pub fn reads(json: &str) -> ConversionResult<VersionedNotebook> {
    let mut value: Value = serde_json::from_str(json)?;

    let major = version_field(&value, "nbformat").ok_or_else(|| {
        ConversionError::InvalidNotebook("missing or invalid nbformat version".to_string())
    })?;
    let minor = version_field(&value, "nbformat_minor").unwrap_or(0);

    match major {
        v3::NBFORMAT => {
            for_each_v3_cell(&mut value, rejoin_v3_cell);
            Ok(VersionedNotebook::V3(serde_json::from_value(value)?))
        }
        v4::NBFORMAT => {
            for_each_v4_cell(&mut value, rejoin_v4_cell);
            Ok(VersionedNotebook::V4(serde_json::from_value(value)?))
        }
        _ => Err(ConversionError::UnsupportedVersion { major, minor }),
    }
}

/// Serialize a notebook to Jupyter-style JSON (one-space indent, trailing newline).
pub fn writes(notebook: &VersionedNotebook) -> ConversionResult<String> {
    let value = match notebook {
        VersionedNotebook::V3(nb) => {
            let mut value = serde_json::to_value(nb)?;
            for_each_v3_cell(&mut value, split_v3_cell);
            value
        }
        VersionedNotebook::V4(nb) => {
            let mut value = serde_json::to_value(nb)?;
            for_each_v4_cell(&mut value, split_v4_cell);
            value
        }
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;

    let mut text = String::from_utf8(buf)
        .map_err(|e| ConversionError::InvalidNotebook(format!("non UTF-8 output: {}", e)))?;
    text.push('\n');
    Ok(text)
}

/// Read a notebook from a file.
pub fn read_file(path: impl AsRef<Path>) -> ConversionResult<VersionedNotebook> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ConversionError::ReadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    reads(&content)
}

/// Write a notebook to a file.
pub fn write_file(path: impl AsRef<Path>, notebook: &VersionedNotebook) -> ConversionResult<()> {
    let path = path.as_ref();
    let json = writes(notebook)?;
    fs::write(path, json).map_err(|e| ConversionError::WriteError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(())
}

fn version_field(value: &Value, key: &str) -> Option<u32> {
    value
        .get(key)?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
}

fn for_each_v3_cell(notebook: &mut Value, f: fn(&mut Value)) {
    let Some(worksheets) = notebook.get_mut("worksheets").and_then(Value::as_array_mut) else {
        return;
    };
    for worksheet in worksheets {
        if let Some(cells) = worksheet.get_mut("cells").and_then(Value::as_array_mut) {
            cells.iter_mut().for_each(f);
        }
    }
}

fn for_each_v4_cell(notebook: &mut Value, f: fn(&mut Value)) {
    if let Some(cells) = notebook.get_mut("cells").and_then(Value::as_array_mut) {
        cells.iter_mut().for_each(f);
    }
}

fn outputs_mut(cell: &mut Value) -> impl Iterator<Item = &mut Value> {
    cell.get_mut("outputs")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
}

fn rejoin_v3_cell(cell: &mut Value) {
    for key in ["input", "source"] {
        if let Some(text) = cell.get_mut(key) {
            join_lines(text);
        }
    }
    for output in outputs_mut(cell) {
        for key in V3_MULTILINE_OUTPUTS {
            if let Some(payload) = output.get_mut(key) {
                join_lines(payload);
            }
        }
    }
}

fn split_v3_cell(cell: &mut Value) {
    for key in ["input", "source"] {
        if let Some(text) = cell.get_mut(key) {
            split_lines(text);
        }
    }
    for output in outputs_mut(cell) {
        for key in V3_MULTILINE_OUTPUTS {
            if let Some(payload) = output.get_mut(key) {
                split_lines(payload);
            }
        }
    }
}

fn rejoin_v4_cell(cell: &mut Value) {
    if let Some(source) = cell.get_mut("source") {
        join_lines(source);
    }
    for bundle in attachment_bundles(cell) {
        rejoin_bundle(bundle);
    }
    for output in outputs_mut(cell) {
        if let Some(text) = output.get_mut("text") {
            join_lines(text);
        }
        if let Some(data) = output.get_mut("data") {
            rejoin_bundle(data);
        }
    }
}

fn split_v4_cell(cell: &mut Value) {
    if let Some(source) = cell.get_mut("source") {
        split_lines(source);
    }
    for bundle in attachment_bundles(cell) {
        split_bundle(bundle);
    }
    for output in outputs_mut(cell) {
        if let Some(text) = output.get_mut("text") {
            split_lines(text);
        }
        if let Some(data) = output.get_mut("data") {
            split_bundle(data);
        }
    }
}

fn attachment_bundles(cell: &mut Value) -> Vec<&mut Value> {
    cell.get_mut("attachments")
        .and_then(Value::as_object_mut)
        .map(|attachments| attachments.values_mut().collect())
        .unwrap_or_default()
}

/// Join every text payload of a MIME bundle. JSON payloads are structured.
fn rejoin_bundle(bundle: &mut Value) {
    if let Some(bundle) = bundle.as_object_mut() {
        for (key, payload) in bundle.iter_mut() {
            if !is_json_key(key) {
                join_lines(payload);
            }
        }
    }
}

/// Split text payloads of a MIME bundle. Base64 images stay on one line.
fn split_bundle(bundle: &mut Value) {
    if let Some(bundle) = bundle.as_object_mut() {
        for (key, payload) in bundle.iter_mut() {
            if !is_json_key(key) && !is_binary_key(key) {
                split_lines(payload);
            }
        }
    }
}

fn join_lines(value: &mut Value) {
    if let Value::Array(lines) = value
        && lines.iter().all(Value::is_string)
    {
        let joined: String = lines.iter().filter_map(Value::as_str).collect();
        *value = Value::String(joined);
    }
}

fn split_lines(value: &mut Value) {
    if let Value::String(text) = value {
        let lines = text
            .split_inclusive('\n')
            .map(|line| Value::String(line.to_string()))
            .collect();
        *value = Value::Array(lines);
    }
}
