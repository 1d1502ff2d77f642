use super::*;
use crate::FactRuleKind;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Options that never touch the real system or home directory.
fn isolated_options(cwd: &Path) -> LayeredConfigOptions {
    let mut options = LayeredConfigOptions::new(cwd);
    options.system_config_path = None;
    options.user_config_path = None;
    options
}

#[test]
fn parse_minimal_config() {
    let config = AliceConfig::load_from_str("{}").expect("config");
    assert_eq!(config, AliceConfig::default());
    assert_eq!(config.retrieval.top_k, 3);
    assert_eq!(config.extraction.rules, FactRuleKind::ALL.to_vec());
}

#[test]
fn parses_json5_with_comments_and_partial_sections() {
    let json5 = r#"{
        // only override what matters
        retrieval: { top_k: 5, min_score: 0.3 },
        extraction: { rules: ["location", "date"] },
        conversation: { enhance_replies: false },
    }"#;
    let config = AliceConfig::load_from_str(json5).expect("config");
    assert_eq!(config.retrieval.top_k, 5);
    assert_eq!(config.retrieval.min_score, 0.3);
    assert_eq!(config.retrieval.half_life_hours, 720.0);
    assert_eq!(
        config.extraction.rules,
        vec![FactRuleKind::Location, FactRuleKind::Date]
    );
    assert!(!config.conversation.enhance_replies);
    assert_eq!(config.conversation.context_window, 10);
}

#[test]
fn rejects_unknown_top_level_key() {
    let err = AliceConfig::load_from_str("{ unexpected: true }").unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("unknown key"));
    assert!(msg.contains("unexpected"));
}

#[test]
fn rejects_unknown_nested_key() {
    let err = AliceConfig::load_from_str("{ retrieval: { topk: 2 } }").unwrap_err();
    assert!(format!("{err}").contains("retrieval.topk"));
}

#[test]
fn rejects_unknown_rule_name() {
    let err = AliceConfig::load_from_str(r#"{ extraction: { rules: ["weather"] } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("extraction.rules[0]"));
    assert!(msg.contains("unknown rule"));
}

#[test]
fn rejects_wrong_field_type() {
    let err = AliceConfig::load_from_str(r#"{ retrieval: { top_k: "three" } }"#).unwrap_err();
    assert!(format!("{err}").contains("expected non-negative integer"));
}

#[test]
fn rejects_out_of_range_values() {
    let err = AliceConfig::load_from_str("{ retrieval: { top_k: 0 } }").unwrap_err();
    assert!(format!("{err}").contains("retrieval.top_k"));

    let err = AliceConfig::load_from_str("{ scoring: { base: { location: 1.5 } } }").unwrap_err();
    assert!(format!("{err}").contains("scoring.base.location"));

    let err = AliceConfig::load_from_str("{ retrieval: { half_life_hours: 0 } }").unwrap_err();
    assert!(format!("{err}").contains("half_life_hours"));
}

#[test]
fn rejects_duplicate_rules() {
    let err = AliceConfig::load_from_str(r#"{ extraction: { rules: ["date", "date"] } }"#)
        .unwrap_err();
    assert!(format!("{err}").contains("more than once"));
}

#[test]
fn layered_config_applies_precedence() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let project_root = root.join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("subdir");
    fs::create_dir_all(&cwd).expect("cwd");

    let system_config = root.join("system.json5");
    write_json5(
        &system_config,
        "{ retrieval: { top_k: 1, min_score: 0.5 }, analyzer: { top_topics: 2 } }",
    );
    let user_config = root.join("user.json5");
    write_json5(&user_config, "{ retrieval: { top_k: 2 } }");
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        "{ retrieval: { top_k: 4 }, memory: { path: \"project-memory\" } }",
    );
    write_json5(&cwd.join(DEFAULT_CONFIG_FILE), "{ retrieval: { top_k: 6 } }");
    let runtime_config = root.join("runtime.json5");
    write_json5(&runtime_config, "{ memory: { path: \"runtime-memory\" } }");

    let mut options = LayeredConfigOptions::new(&cwd).with_runtime_path(&runtime_config);
    options.system_config_path = Some(system_config);
    options.user_config_path = Some(user_config);

    let layered = AliceConfig::load_layered_with_options(options).expect("config");
    let sources: Vec<ConfigLayerSource> =
        layered.layers.iter().map(|layer| layer.source).collect();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::System,
            ConfigLayerSource::User,
            ConfigLayerSource::Project,
            ConfigLayerSource::Cwd,
            ConfigLayerSource::Runtime,
        ]
    );
    assert_eq!(layered.config.retrieval.top_k, 6);
    assert_eq!(layered.config.retrieval.min_score, 0.5);
    assert_eq!(layered.config.analyzer.top_topics, 2);
    assert_eq!(
        layered.config.memory.path.as_deref(),
        Some("runtime-memory")
    );
}

#[test]
fn layered_config_skips_missing_optional_layers() {
    let temp = TempDir::new().expect("tmp");
    let layered =
        AliceConfig::load_layered_with_options(isolated_options(temp.path())).expect("config");
    assert!(layered.layers.is_empty());
    assert_eq!(layered.config, AliceConfig::default());
}

#[test]
fn project_root_equal_to_cwd_loads_once() {
    let temp = TempDir::new().expect("tmp");
    fs::create_dir_all(temp.path().join(".git")).expect("git");
    write_json5(
        &temp.path().join(DEFAULT_CONFIG_FILE),
        "{ analyzer: { min_word_len: 4 } }",
    );
    let layered =
        AliceConfig::load_layered_with_options(isolated_options(temp.path())).expect("config");
    assert_eq!(layered.layers.len(), 1);
    assert_eq!(layered.layers[0].source, ConfigLayerSource::Project);
    assert_eq!(layered.config.analyzer.min_word_len, 4);
}

#[test]
fn missing_runtime_layer_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let options =
        isolated_options(temp.path()).with_runtime_path(temp.path().join("absent.json5"));
    let err = AliceConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}

#[test]
fn invalid_layer_error_names_the_layer() {
    let temp = TempDir::new().expect("tmp");
    write_json5(
        &temp.path().join(DEFAULT_CONFIG_FILE),
        "{ memory: { compaction: { enabled: \"yes\" } } }",
    );
    let err = AliceConfig::load_layered_with_options(isolated_options(temp.path())).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cwd("));
    assert!(msg.contains("memory.compaction.enabled"));
}

#[test]
fn builder_overrides_memory_path() {
    let config = AliceConfig::builder().memory_path("/tmp/alice-memory").build();
    assert_eq!(
        config.memory.resolved_path(),
        std::path::PathBuf::from("/tmp/alice-memory")
    );
    assert_eq!(
        AliceConfig::default().memory.resolved_path(),
        Path::new(".alice").join("memory")
    );
}
