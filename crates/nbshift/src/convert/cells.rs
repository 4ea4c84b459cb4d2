//! Cell conversion.

use serde_json::{Map, Value};

use super::Converter;
use super::outputs::{downgrade_outputs, upgrade_outputs};
use crate::error::{ConversionError, ConversionResult};
use crate::v3::MAX_HEADING_LEVEL;
use crate::{v3, v4};

impl Converter {
    /// Upgrade a cell from v3 to v4.
    ///
    /// - heading cells become markdown headings (`## Title`)
    /// - code cells drop `language`, `input` becomes `source`,
    ///   `prompt_number` becomes `execution_count`, `collapsed` moves
    ///   into metadata, outputs are upgraded
    /// - legacy html cells become markdown
    ///
    /// The new cell gets an id according to the configured strategy.
    pub fn upgrade_cell(&mut self, cell: v3::Cell) -> ConversionResult<v4::Cell> {
        let id = Some(self.next_cell_id());

        let upgraded = match cell {
            v3::Cell::Code {
                input,
                collapsed,
                prompt_number,
                outputs,
                mut metadata,
                ..
            } => {
                if let Some(collapsed) = collapsed {
                    metadata.insert("collapsed".to_string(), Value::Bool(collapsed));
                }
                v4::Cell::Code {
                    id,
                    metadata,
                    source: input,
                    execution_count: prompt_number,
                    outputs: upgrade_outputs(outputs)?,
                }
            }
            v3::Cell::Heading {
                source,
                level,
                metadata,
            } => v4::Cell::Markdown {
                id,
                metadata,
                source: heading_to_markdown(level, &source)?,
                attachments: None,
            },
            v3::Cell::Markdown { source, metadata } | v3::Cell::Html { source, metadata } => {
                v4::Cell::Markdown {
                    id,
                    metadata,
                    source,
                    attachments: None,
                }
            }
            v3::Cell::Raw { source, metadata } => v4::Cell::Raw {
                id,
                metadata,
                source,
                attachments: None,
            },
        };

        Ok(upgraded)
    }

    /// Downgrade a cell from v4 to v3 using the configured default language.
    pub fn downgrade_cell(&self, cell: v4::Cell) -> ConversionResult<v3::Cell> {
        downgrade_cell_with_language(cell, &self.options.default_language)
    }
}

/// Downgrade a cell from v4 to v3.
///
/// - code cells get `language`, `source` becomes `input`,
///   `execution_count` becomes `prompt_number`, `metadata.collapsed`
///   becomes `collapsed`, outputs are downgraded
/// - single-line markdown headings become heading cells
///
/// Cell ids and attachments have no v3 form and are dropped.
pub fn downgrade_cell_with_language(cell: v4::Cell, language: &str) -> ConversionResult<v3::Cell> {
    let downgraded = match cell {
        v4::Cell::Code {
            id,
            mut metadata,
            source,
            execution_count,
            outputs,
        } => {
            log_dropped(id.as_deref(), None);
            let collapsed = take_collapsed(&mut metadata);
            v3::Cell::Code {
                language: language.to_string(),
                input: source,
                collapsed,
                prompt_number: execution_count,
                outputs: downgrade_outputs(outputs)?,
                metadata,
            }
        }
        v4::Cell::Markdown {
            id,
            metadata,
            source,
            attachments,
        } => {
            log_dropped(id.as_deref(), attachments.as_ref());
            match markdown_heading(&source) {
                Some((level, text)) => v3::Cell::Heading {
                    source: text.to_string(),
                    level,
                    metadata,
                },
                None => v3::Cell::Markdown { source, metadata },
            }
        }
        v4::Cell::Raw {
            id,
            metadata,
            source,
            attachments,
        } => {
            log_dropped(id.as_deref(), attachments.as_ref());
            v3::Cell::Raw { source, metadata }
        }
    };

    Ok(downgraded)
}

/// Render a heading cell as a single-line markdown heading.
fn heading_to_markdown(level: u32, source: &str) -> ConversionResult<String> {
    if !(1..=MAX_HEADING_LEVEL).contains(&level) {
        return Err(ConversionError::MalformedCell(format!(
            "heading level {} outside 1..={}",
            level, MAX_HEADING_LEVEL
        )));
    }

    let single_line = source.lines().collect::<Vec<_>>().join(" ");
    Ok(format!("{} {}", "#".repeat(level as usize), single_line))
}

/// Parse a single-line markdown heading into `(level, text)`.
///
/// Matches one to six `#`, one space, then text not starting with
/// whitespace. Only sources that [`heading_to_markdown`] renders back
/// unchanged count, so `#tag`, `#  x`, `##` and multi-line text stay
/// markdown.
pub(crate) fn markdown_heading(source: &str) -> Option<(u32, &str)> {
    let rest = source.trim_start_matches('#');
    let level = u32::try_from(source.len() - rest.len()).ok()?;
    if !(1..=MAX_HEADING_LEVEL).contains(&level) {
        return None;
    }

    let text = rest.strip_prefix(' ')?;
    if text.starts_with(char::is_whitespace) {
        return None;
    }

    let rendered = heading_to_markdown(level, text).ok()?;
    (rendered == source).then_some((level, text))
}

fn take_collapsed(metadata: &mut Map<String, Value>) -> Option<bool> {
    match metadata.remove("collapsed") {
        Some(Value::Bool(collapsed)) => Some(collapsed),
        Some(other) => {
            // Not a flag v3 understands; leave it where it was.
            metadata.insert("collapsed".to_string(), other);
            None
        }
        None => None,
    }
}

fn log_dropped(id: Option<&str>, attachments: Option<&Map<String, Value>>) {
    if let Some(id) = id {
        tracing::debug!("Dropping cell id {} (no v3 equivalent)", id);
    }
    if let Some(attachments) = attachments
        && !attachments.is_empty()
    {
        tracing::debug!(
            "Dropping {} attachment(s) (no v3 equivalent)",
            attachments.len()
        );
    }
}
