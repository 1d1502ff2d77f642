//! Schema validation for Alice JSON5 configuration.
//!
//! Runs before serde decoding so that typos and wrong types surface with a
//! path such as `user(~/.alice/alice.json5):retrieval.top_k`.

use crate::ConfigError;
use serde_json::{Map, Value};

const RULE_NAMES: &[&str] = &[
    "date",
    "schedule",
    "location",
    "personal",
    "preference",
    "reminder",
];

/// Validate a config document (a single layer or the merged result).
pub(super) fn validate_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(
        map,
        &[
            "$schema",
            "memory",
            "extraction",
            "scoring",
            "retrieval",
            "analyzer",
            "conversation",
        ],
        layer,
        "",
    )?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("memory") {
        validate_memory(value, layer, "memory")?;
    }
    if let Some(value) = map.get("extraction") {
        validate_extraction(value, layer, "extraction")?;
    }
    if let Some(value) = map.get("scoring") {
        validate_scoring(value, layer, "scoring")?;
    }
    if let Some(value) = map.get("retrieval") {
        validate_numbers(
            value,
            layer,
            "retrieval",
            &["min_score", "half_life_hours", "min_decay", "topic_boost"],
            &["top_k"],
        )?;
    }
    if let Some(value) = map.get("analyzer") {
        validate_numbers(value, layer, "analyzer", &[], &["top_topics", "min_word_len"])?;
    }
    if let Some(value) = map.get("conversation") {
        validate_conversation(value, layer, "conversation")?;
    }
    Ok(())
}

/// Validate the "memory" block.
fn validate_memory(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["path", "compaction"], layer, path)?;
    if let Some(value) = map.get("path") {
        expect_string(value, layer, &join_path(path, "path"))?;
    }
    if let Some(value) = map.get("compaction") {
        let compaction_path = join_path(path, "compaction");
        let compaction = expect_object(value, layer, &compaction_path)?;
        ensure_allowed_keys(
            compaction,
            &["enabled", "max_log_entries"],
            layer,
            &compaction_path,
        )?;
        if let Some(value) = compaction.get("enabled") {
            expect_bool(value, layer, &join_path(&compaction_path, "enabled"))?;
        }
        if let Some(value) = compaction.get("max_log_entries") {
            expect_u64(value, layer, &join_path(&compaction_path, "max_log_entries"))?;
        }
    }
    Ok(())
}

/// Validate the "extraction" block.
fn validate_extraction(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["rules", "hedge_words", "min_confidence"], layer, path)?;
    if let Some(value) = map.get("rules") {
        let rules_path = join_path(path, "rules");
        let Value::Array(rules) = value else {
            return Err(invalid_field(layer, &rules_path, "expected array"));
        };
        for (idx, rule) in rules.iter().enumerate() {
            let entry_path = format!("{rules_path}[{idx}]");
            match rule.as_str() {
                Some(name) if RULE_NAMES.contains(&name) => {}
                Some(_) => return Err(invalid_field(layer, &entry_path, "unknown rule")),
                None => return Err(invalid_field(layer, &entry_path, "expected string")),
            }
        }
    }
    if let Some(value) = map.get("hedge_words") {
        validate_string_array(value, layer, &join_path(path, "hedge_words"))?;
    }
    if let Some(value) = map.get("min_confidence") {
        expect_f64(value, layer, &join_path(path, "min_confidence"))?;
    }
    Ok(())
}

/// Validate the "scoring" block, including per-rule base scores.
fn validate_scoring(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &[
            "base",
            "hedge_penalty",
            "reinforcement_boost",
            "max_reinforcement",
        ],
        layer,
        path,
    )?;
    for key in ["hedge_penalty", "reinforcement_boost", "max_reinforcement"] {
        if let Some(value) = map.get(key) {
            expect_f64(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("base") {
        validate_numbers(value, layer, &join_path(path, "base"), RULE_NAMES, &[])?;
    }
    Ok(())
}

/// Validate the "conversation" block.
fn validate_conversation(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["context_window", "system_prompt", "enhance_replies"],
        layer,
        path,
    )?;
    if let Some(value) = map.get("context_window") {
        expect_u64(value, layer, &join_path(path, "context_window"))?;
    }
    if let Some(value) = map.get("system_prompt") {
        expect_string(value, layer, &join_path(path, "system_prompt"))?;
    }
    if let Some(value) = map.get("enhance_replies") {
        expect_bool(value, layer, &join_path(path, "enhance_replies"))?;
    }
    Ok(())
}

/// Validate an object whose keys are all numeric: `floats` accept any
/// number, `integers` only non-negative integers.
fn validate_numbers(
    value: &Value,
    layer: &str,
    path: &str,
    floats: &[&str],
    integers: &[&str],
) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    let allowed: Vec<&str> = floats.iter().chain(integers).copied().collect();
    ensure_allowed_keys(map, &allowed, layer, path)?;
    for (key, value) in map {
        let field = join_path(path, key);
        if integers.contains(&key.as_str()) {
            expect_u64(value, layer, &field)?;
        } else {
            expect_f64(value, layer, &field)?;
        }
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_boolean() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

fn expect_f64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_number() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected number"))
    }
}

/// Validate that a value is an array of strings.
fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Value::Array(entries) = value else {
        return Err(invalid_field(layer, path, "expected array"));
    };
    for (idx, entry) in entries.iter().enumerate() {
        if !entry.is_string() {
            return Err(invalid_field(
                layer,
                &format!("{path}[{idx}]"),
                "expected string",
            ));
        }
    }
    Ok(())
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    match map.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(invalid_field(layer, &join_path(path, key), "unknown key")),
        None => Ok(()),
    }
}

/// Join nested paths for error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
