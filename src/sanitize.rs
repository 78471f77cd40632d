use serde_json::Value;

use crate::error::PipelineError;

// One named normalization step. Rules run in declaration order; each one
// is a textual best-effort cleanup for a known model-output quirk, not a
// markdown parser. A new quirk gets a new named rule.
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

fn strip_json_fences(text: &str) -> String {
    text.replace("```json", "")
}

fn strip_fences(text: &str) -> String {
    text.replace("```", "")
}

fn strip_newlines(text: &str) -> String {
    text.replace(['\n', '\r'], "")
}

fn trim_edges(text: &str) -> String {
    text.trim().to_string()
}

pub const RULES: [Rule; 4] = [
    Rule {
        name: "strip-json-fences",
        apply: strip_json_fences,
    },
    Rule {
        name: "strip-fences",
        apply: strip_fences,
    },
    Rule {
        name: "strip-newlines",
        apply: strip_newlines,
    },
    Rule {
        name: "trim-edges",
        apply: trim_edges,
    },
];

pub fn clean(raw: &str) -> String {
    RULES
        .iter()
        .fold(raw.to_string(), |text, rule| (rule.apply)(&text))
}

// Cleaned text rides along in the error for diagnostics when parsing fails
pub fn decode(raw: &str) -> Result<Value, PipelineError> {
    let cleaned = clean(raw);
    serde_json::from_str(&cleaned).map_err(|_| PipelineError::MalformedPayload(cleaned))
}
