//! Output conversion.
//!
//! - `pyout` ↔ `execute_result`, `prompt_number` ↔ `execution_count`
//! - `pyerr` ↔ `error`
//! - flat alias payloads ↔ nested `data` bundle keyed by MIME type
//! - `stream.stream` ↔ `stream.name`

use serde_json::Value;

use crate::error::{ConversionError, ConversionResult};
use crate::mime::{MimeBundle, alias_for_mime, from_mime_key, to_mime_key};
use crate::{v3, v4};

/// Fields of a v3 `pyout`/`display_data` that cannot double as payload keys.
const RESERVED_V3_KEYS: [&str; 3] = ["output_type", "prompt_number", "metadata"];

/// Upgrade a single code cell output from v3 to v4.
pub fn upgrade_output(output: v3::Output) -> ConversionResult<v4::Output> {
    let upgraded = match output {
        v3::Output::Pyout {
            prompt_number,
            metadata,
            data,
        } => v4::Output::ExecuteResult {
            execution_count: prompt_number,
            data: upgrade_data(data)?,
            metadata: to_mime_key(metadata),
        },
        v3::Output::DisplayData { metadata, data } => v4::Output::DisplayData {
            data: upgrade_data(data)?,
            metadata: to_mime_key(metadata),
        },
        v3::Output::Stream { stream, text } => v4::Output::Stream { name: stream, text },
        v3::Output::Pyerr {
            ename,
            evalue,
            traceback,
        } => v4::Output::Error {
            ename,
            evalue,
            traceback,
        },
    };
    Ok(upgraded)
}

/// Downgrade a single code cell output from v4 to v3.
pub fn downgrade_output(output: v4::Output) -> ConversionResult<v3::Output> {
    let downgraded = match output {
        v4::Output::ExecuteResult {
            execution_count,
            data,
            metadata,
        } => v3::Output::Pyout {
            prompt_number: execution_count,
            metadata: from_mime_key(metadata),
            data: downgrade_data(data)?,
        },
        v4::Output::DisplayData { data, metadata } => v3::Output::DisplayData {
            metadata: from_mime_key(metadata),
            data: downgrade_data(data)?,
        },
        v4::Output::Stream { name, text } => v3::Output::Stream { stream: name, text },
        v4::Output::Error {
            ename,
            evalue,
            traceback,
        } => v3::Output::Pyerr {
            ename,
            evalue,
            traceback,
        },
    };
    Ok(downgraded)
}

/// Upgrade outputs in order. Stops at the first failure.
pub fn upgrade_outputs(outputs: Vec<v3::Output>) -> ConversionResult<Vec<v4::Output>> {
    outputs.into_iter().map(upgrade_output).collect()
}

/// Downgrade outputs in order. Stops at the first failure.
pub fn downgrade_outputs(outputs: Vec<v4::Output>) -> ConversionResult<Vec<v3::Output>> {
    outputs.into_iter().map(downgrade_output).collect()
}

fn upgrade_data(data: MimeBundle) -> ConversionResult<MimeBundle> {
    let mut data = to_mime_key(data);

    // v3 stores JSON payloads as text, v4 as structured values.
    if let Some(Value::String(text)) = data.get("application/json") {
        let parsed: Value = serde_json::from_str(text).map_err(|e| {
            ConversionError::MalformedOutput(format!(
                "application/json payload is not valid JSON: {}",
                e
            ))
        })?;
        data.insert("application/json".to_string(), parsed);
    }

    Ok(data)
}

fn downgrade_data(data: MimeBundle) -> ConversionResult<MimeBundle> {
    if let Some((mime, alias)) = data.keys().find_map(|key| {
        alias_for_mime(key)
            .filter(|alias| data.contains_key(*alias))
            .map(|alias| (key, alias))
    }) {
        return Err(ConversionError::Unrepresentable(format!(
            "output data has both '{}' and its v3 alias '{}'",
            mime, alias
        )));
    }

    let mut data = from_mime_key(data);

    if let Some(key) = data.keys().find(|key| RESERVED_V3_KEYS.contains(&key.as_str())) {
        return Err(ConversionError::Unrepresentable(format!(
            "output data key '{}' collides with a v3 output field",
            key
        )));
    }

    if let Some(payload) = data.get_mut("json") {
        let text = serde_json::to_string(payload)?;
        *payload = Value::String(text);
    }

    Ok(data)
}
