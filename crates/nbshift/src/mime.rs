//! MIME keys and the nbformat v3 short aliases.
//!
//! v3 outputs store their payloads under short names (`text`, `png`, ...)
//! directly on the output object. v4 nests them in a `data` bundle keyed by
//! the full MIME type. The table here is the single source of truth for both
//! directions.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

/// Payloads keyed by MIME type (v4) or alias (v3).
pub type MimeBundle = Map<String, Value>;

/// `(v3 alias, MIME type)` pairs.
pub const MIME_ALIASES: [(&str, &str); 8] = [
    ("text", "text/plain"),
    ("html", "text/html"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpeg", "image/jpeg"),
    ("latex", "text/latex"),
    ("json", "application/json"),
    ("javascript", "application/javascript"),
];

static ALIAS_TO_MIME: LazyLock<FxHashMap<&'static str, &'static str>> =
    LazyLock::new(|| MIME_ALIASES.iter().copied().collect());

static MIME_TO_ALIAS: LazyLock<FxHashMap<&'static str, &'static str>> =
    LazyLock::new(|| MIME_ALIASES.iter().map(|&(alias, mime)| (mime, alias)).collect());

/// Look up the MIME type for a v3 alias.
pub fn mime_for_alias(alias: &str) -> Option<&'static str> {
    ALIAS_TO_MIME.get(alias).copied()
}

/// Look up the v3 alias for a MIME type.
pub fn alias_for_mime(mime: &str) -> Option<&'static str> {
    MIME_TO_ALIAS.get(mime).copied()
}

/// Rewrite v3 alias keys to MIME types. Unknown keys pass through.
pub fn to_mime_key(bundle: MimeBundle) -> MimeBundle {
    rename_keys(bundle, mime_for_alias)
}

/// Rewrite MIME type keys to v3 aliases. Unknown keys pass through.
pub fn from_mime_key(bundle: MimeBundle) -> MimeBundle {
    rename_keys(bundle, alias_for_mime)
}

/// Whether the payload under `key` is structured JSON rather than text.
pub fn is_json_key(key: &str) -> bool {
    key == "json" || key == "application/json" || key.ends_with("+json")
}

/// Whether the payload under `key` is base64 encoded binary data.
pub fn is_binary_key(key: &str) -> bool {
    match key {
        "png" | "jpeg" => true,
        "image/svg+xml" => false,
        _ => key.starts_with("image/"),
    }
}

fn rename_keys(bundle: MimeBundle, lookup: fn(&str) -> Option<&'static str>) -> MimeBundle {
    let mut kept = MimeBundle::new();
    let mut renamed = MimeBundle::new();

    for (key, value) in bundle {
        match lookup(&key) {
            Some(target) => {
                renamed.insert(target.to_string(), value);
            }
            None => {
                kept.insert(key, value);
            }
        }
    }

    // A renamed entry replaces a pass-through key of the same name.
    for (key, value) in renamed {
        if kept.insert(key.clone(), value).is_some() {
            tracing::debug!("MIME key {} present twice, keeping the renamed entry", key);
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle(value: Value) -> MimeBundle {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_to_mime_key_rewrites_known_aliases() {
        let d = bundle(json!({"text": "hi", "png": "iVBOR", "latex": "$x$"}));
        let mimed = to_mime_key(d);

        assert_eq!(mimed["text/plain"], json!("hi"));
        assert_eq!(mimed["image/png"], json!("iVBOR"));
        assert_eq!(mimed["text/latex"], json!("$x$"));
        assert_eq!(mimed.len(), 3);
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let d = bundle(json!({"application/vnd.custom": 1, "text": "x"}));

        let mimed = to_mime_key(d);
        assert_eq!(mimed["application/vnd.custom"], json!(1));

        let aliased = from_mime_key(mimed);
        assert_eq!(aliased["application/vnd.custom"], json!(1));
        assert_eq!(aliased["text"], json!("x"));
    }

    #[test]
    fn test_every_alias_round_trips() {
        let d: MimeBundle = MIME_ALIASES
            .iter()
            .enumerate()
            .map(|(i, (alias, _))| (alias.to_string(), json!(i)))
            .collect();

        let mimed = to_mime_key(d.clone());
        for (_, mime) in MIME_ALIASES {
            assert!(mimed.contains_key(mime), "missing {}", mime);
        }
        assert_eq!(from_mime_key(mimed), d);
    }

    #[test]
    fn test_renamed_entry_wins_on_collision() {
        let d = bundle(json!({"text": "alias", "text/plain": "mime"}));
        let mimed = to_mime_key(d);

        assert_eq!(mimed.len(), 1);
        assert_eq!(mimed["text/plain"], json!("alias"));
    }

    #[test]
    fn test_lookup_helpers() {
        assert_eq!(mime_for_alias("svg"), Some("image/svg+xml"));
        assert_eq!(alias_for_mime("application/javascript"), Some("javascript"));
        assert_eq!(mime_for_alias("text/plain"), None);
        assert_eq!(alias_for_mime("text"), None);
    }

    #[test]
    fn test_key_classification() {
        assert!(is_json_key("application/json"));
        assert!(is_json_key("application/vnd.jupyter.widget-view+json"));
        assert!(is_json_key("json"));
        assert!(!is_json_key("text/plain"));

        assert!(is_binary_key("image/png"));
        assert!(is_binary_key("jpeg"));
        assert!(!is_binary_key("image/svg+xml"));
        assert!(!is_binary_key("text/html"));
    }
}
