//! Integration tests for notebook version conversion.
//!
//! Tests v3 → v4 → v3 and v4 → v3 → v4 round trips, plus the full
//! file pipeline.

use std::fs;

use nbshift::{
    CellKind, ConvertOptions, Converter, MimeBundle, VersionedNotebook, downgrade, from_mime_key,
    io, to_mime_key, upgrade, upgrade_output, v3, v4,
};
use serde_json::{Map, Value, json};
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

fn bundle(value: Value) -> MimeBundle {
    match value {
        Value::Object(map) => map,
        _ => panic!("Expected object"),
    }
}

/// A v3 notebook using every cell and output kind.
fn rich_v3_notebook() -> v3::Notebook {
    let code = v3::Cell::Code {
        language: "python".to_string(),
        input: "import math\nmath.pi".to_string(),
        collapsed: Some(false),
        prompt_number: Some(3),
        outputs: vec![
            v3::Output::Stream {
                stream: "stderr".to_string(),
                text: "warning\n".to_string(),
            },
            v3::Output::Pyout {
                prompt_number: Some(3),
                metadata: Map::new(),
                data: bundle(json!({"text": "3.14159", "latex": "$\\pi$"})),
            },
            v3::Output::DisplayData {
                metadata: bundle(json!({"png": {"width": 640}})),
                data: bundle(json!({"png": "iVBORw0KGgo=", "json": "{\"a\":[1,2]}"})),
            },
            v3::Output::Pyerr {
                ename: "ZeroDivisionError".to_string(),
                evalue: "division by zero".to_string(),
                traceback: vec!["Traceback".to_string(), "  line 1".to_string()],
            },
        ],
        metadata: bundle(json!({"tags": ["slow"]})),
    };

    let mut nb = v3::Notebook::new();
    nb.metadata.insert("name".to_string(), json!(""));
    nb.orig_nbformat = Some(3);
    nb.orig_nbformat_minor = Some(0);
    nb.worksheets[0].cells = vec![
        v3::Cell::heading(1, "Analysis"),
        v3::Cell::markdown("Some *prose*.\n\nMore."),
        code,
        v3::Cell::Raw {
            source: "raw text".to_string(),
            metadata: Map::new(),
        },
        v3::Cell::heading(4, "Appendix"),
    ];
    nb
}

/// A v4 notebook whose content v3 can express.
fn rich_v4_notebook() -> v4::Notebook {
    let mut nb = v4::Notebook::new();
    nb.metadata.insert(
        "kernelspec".to_string(),
        json!({"name": "python3", "language": "python", "display_name": "Python 3"}),
    );
    nb.cells = vec![
        v4::Cell::markdown("## Setup"),
        v4::Cell::Code {
            id: None,
            metadata: bundle(json!({"collapsed": true})),
            source: "x = {'a': 1}\nx".to_string(),
            execution_count: Some(1),
            outputs: vec![
                v4::Output::ExecuteResult {
                    execution_count: Some(1),
                    data: bundle(json!({
                        "text/plain": "{'a': 1}",
                        "application/json": {"a": 1},
                        "application/vnd.custom+json": {"nested": true}
                    })),
                    metadata: Map::new(),
                },
                v4::Output::stream("stdout", "done\n"),
            ],
        },
        v4::Cell::markdown("# Title\n\nMulti-line markdown is not a heading"),
        v4::Cell::raw("raw"),
    ];
    nb
}

/// Remove what v4 has and v3 cannot carry.
fn strip_v4_only(mut nb: v4::Notebook) -> v4::Notebook {
    nb.metadata.remove("orig_nbformat");
    nb.metadata.remove("orig_nbformat_minor");
    for cell in &mut nb.cells {
        match cell {
            v4::Cell::Code { id, .. } => *id = None,
            v4::Cell::Markdown {
                id, attachments, ..
            }
            | v4::Cell::Raw {
                id, attachments, ..
            } => {
                *id = None;
                *attachments = None;
            }
        }
    }
    nb
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_v3_round_trip() {
    let original = rich_v3_notebook();

    let upgraded = upgrade(original.clone()).expect("upgrade should succeed");
    let back = downgrade(upgraded).expect("downgrade should succeed");

    assert_eq!(back, original);
}

#[test]
fn test_v4_round_trip() {
    let original = rich_v4_notebook();

    let downgraded = downgrade(original.clone()).expect("downgrade should succeed");
    let mut converter = Converter::new(ConvertOptions::reproducible());
    let back = converter
        .upgrade(downgraded.into())
        .expect("upgrade should succeed");

    assert_eq!(strip_v4_only(back), original);
}

#[test]
fn test_v4_round_trip_keeps_heading_like_markdown() {
    let sources = ["#  Two spaces", "#\tTab", "##", "## ", "###### Deep"];
    let mut original = v4::Notebook::new();
    original.cells = sources.iter().map(|s| v4::Cell::markdown(*s)).collect();

    let downgraded = downgrade(original.clone()).unwrap();
    let back = upgrade(downgraded).unwrap();

    let back_sources: Vec<_> = back.cells.iter().map(v4::Cell::source).collect();
    assert_eq!(back_sources, sources);
}

#[test]
fn test_v3_round_trip_known_differences() {
    let mut original = v3_with_cells(vec![
        v3::Cell::code("1"),
        v3::Cell::markdown("# Intro"),
        v3::Cell::heading(3, "  indented"),
        v3::Cell::heading(3, "trailing\n"),
        v3::Cell::Code {
            language: "python".to_string(),
            input: "d".to_string(),
            collapsed: None,
            prompt_number: None,
            outputs: vec![v3::Output::DisplayData {
                metadata: Map::new(),
                data: bundle(json!({"json": "{\"a\": 1}"})),
            }],
            metadata: Map::new(),
        },
    ]);
    original.metadata.insert("name".to_string(), json!("named"));
    original.worksheets.push(v3::Worksheet {
        cells: vec![v3::Cell::heading(2, "two\nlines")],
        metadata: bundle(json!({"ws": 2})),
    });
    if let v3::Cell::Code { language, .. } = &mut original.worksheets[0].cells[0] {
        *language = "haskell".to_string();
    }

    let back = downgrade(upgrade(original).unwrap()).unwrap();

    // Worksheets merge, the name resets, headings become single-line and
    // code cells take the notebook language.
    assert_eq!(back.worksheets.len(), 1);
    assert!(back.worksheets[0].metadata.is_empty());
    assert_eq!(back.metadata["name"], json!(""));
    assert_eq!(back.orig_nbformat, Some(3));
    let cells = &back.worksheets[0].cells;
    assert_eq!(cells.len(), 6);
    assert_eq!(cells[1], v3::Cell::heading(1, "Intro"));
    assert_eq!(cells[2], v3::Cell::markdown("###   indented"));
    assert_eq!(cells[3], v3::Cell::heading(3, "trailing"));
    match &cells[4] {
        v3::Cell::Code { outputs, .. } => match &outputs[0] {
            v3::Output::DisplayData { data, .. } => assert_eq!(data["json"], json!("{\"a\":1}")),
            other => panic!("Expected DisplayData, got {:?}", other),
        },
        other => panic!("Expected Code, got {:?}", other),
    }
    assert_eq!(cells[5], v3::Cell::heading(2, "two lines"));
    match &cells[0] {
        v3::Cell::Code { language, .. } => assert_eq!(language, "python"),
        other => panic!("Expected Code, got {:?}", other),
    }
}

fn v3_with_cells(cells: Vec<v3::Cell>) -> v3::Notebook {
    let mut nb = v3::Notebook::new();
    nb.worksheets[0].cells = cells;
    nb
}

// =============================================================================
// Documented Conversions
// =============================================================================

#[test]
fn test_heading_cell_upgrades_to_markdown() {
    let upgraded = upgrade(v3_with_cells(vec![v3::Cell::heading(2, "Title")])).unwrap();

    assert_eq!(upgraded.cells[0].kind(), CellKind::Markdown);
    assert_eq!(upgraded.cells[0].source(), "## Title");
}

#[test]
fn test_markdown_heading_downgrades_to_heading_cell() {
    let mut nb = v4::Notebook::new();
    nb.cells.push(v4::Cell::markdown("### Sub"));

    let downgraded = downgrade(nb).unwrap();
    assert_eq!(downgraded.worksheets[0].cells[0], v3::Cell::heading(3, "Sub"));
}

#[test]
fn test_pyout_upgrades_to_execute_result() {
    let output = v3::Output::Pyout {
        prompt_number: None,
        metadata: Map::new(),
        data: bundle(json!({"text": "hi"})),
    };

    let upgraded = upgrade_output(output).unwrap();
    let value = serde_json::to_value(&upgraded).unwrap();
    assert_eq!(value["output_type"], json!("execute_result"));
    assert_eq!(value["data"], json!({"text/plain": "hi"}));
}

#[test]
fn test_stream_upgrade_renames_field() {
    let output = v3::Output::Stream {
        stream: "stdout".to_string(),
        text: "x".to_string(),
    };

    let value = serde_json::to_value(upgrade_output(output).unwrap()).unwrap();
    assert_eq!(
        value,
        json!({"output_type": "stream", "name": "stdout", "text": "x"})
    );
}

#[test]
fn test_execution_counts_preserved() {
    for count in [None, Some(0), Some(42)] {
        let mut nb = v4::Notebook::new();
        nb.cells.push(v4::Cell::Code {
            id: None,
            metadata: Map::new(),
            source: String::new(),
            execution_count: count,
            outputs: vec![v4::Output::ExecuteResult {
                execution_count: count,
                data: MimeBundle::new(),
                metadata: Map::new(),
            }],
        });

        let back = upgrade(downgrade(nb).unwrap()).unwrap();
        match &back.cells[0] {
            v4::Cell::Code {
                execution_count,
                outputs,
                ..
            } => {
                assert_eq!(*execution_count, count);
                match &outputs[0] {
                    v4::Output::ExecuteResult {
                        execution_count, ..
                    } => assert_eq!(*execution_count, count),
                    other => panic!("Expected ExecuteResult, got {:?}", other),
                }
            }
            other => panic!("Expected Code, got {:?}", other),
        }
    }
}

#[test]
fn test_mime_keys_round_trip() {
    let d = bundle(json!({
        "text": "a", "html": "b", "svg": "c", "png": "d",
        "jpeg": "e", "latex": "f", "json": "g", "javascript": "h"
    }));

    assert_eq!(from_mime_key(to_mime_key(d.clone())), d);
}

#[test]
fn test_downgrade_uses_kernelspec_language() {
    let mut nb = v4::Notebook::new();
    nb.metadata
        .insert("kernelspec".to_string(), json!({"language": "R", "name": "ir"}));
    nb.cells.push(v4::Cell::code("1 + 1"));

    let downgraded = downgrade(nb).unwrap();
    match &downgraded.worksheets[0].cells[0] {
        v3::Cell::Code { language, .. } => assert_eq!(language, "R"),
        other => panic!("Expected Code, got {:?}", other),
    }
}

// =============================================================================
// File Pipeline Tests
// =============================================================================

#[test]
fn test_file_upgrade_pipeline() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let input = temp.path().join("legacy.ipynb");
    let output = nbshift::default_output_path(&input, 4);

    io::write_file(&input, &rich_v3_notebook().into()).expect("Failed to write input");

    let mut converter = Converter::new(ConvertOptions::reproducible());
    nbshift::convert_file(&input, &output, &mut converter, 4).expect("Failed to convert");

    let content = fs::read_to_string(&output).expect("Failed to read output");
    let value: Value = serde_json::from_str(&content).expect("Output should be valid JSON");
    assert_eq!(value["nbformat"], json!(4));
    assert_eq!(value["nbformat_minor"], json!(5));
    assert_eq!(value["cells"][0]["source"], json!(["# Analysis"]));
    assert_eq!(value["cells"][0]["id"], json!("cell-0"));

    let reread = io::read_file(&output).expect("Failed to reread");
    assert!(matches!(reread, VersionedNotebook::V4(_)));
}

#[test]
fn test_file_round_trip_through_both_versions() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let v3_path = temp.path().join("nb.ipynb");
    let v4_path = temp.path().join("nb.v4.ipynb");
    let back_path = temp.path().join("nb.v3.ipynb");

    let original: VersionedNotebook = rich_v3_notebook().into();
    io::write_file(&v3_path, &original).unwrap();

    let mut converter = Converter::default();
    nbshift::convert_file(&v3_path, &v4_path, &mut converter, 4).unwrap();
    nbshift::convert_file(&v4_path, &back_path, &mut converter, 3).unwrap();

    assert_eq!(io::read_file(&back_path).unwrap(), original);
}
