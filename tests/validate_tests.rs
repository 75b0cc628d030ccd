use model_catalog::{validate_catalog, CatalogError, CatalogShape, CatalogValidator, Config, Outcome, ShapeKind};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

const ENTRY_PATTERN: &str = "^(?!all_models$)[a-zA-Z0-9._-]+$";

fn model_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": ["provider", "model_name", "modalities"],
        "properties": {
            "provider": {"type": "string"},
            "model_name": {"type": "string"},
            "modalities": {"$ref": "#/$defs/modalities"}
        },
        "$defs": {
            "modalities": {
                "type": "object",
                "required": ["text"],
                "properties": {"text": {"type": "boolean"}, "image": {"type": "boolean"}}
            }
        }
    })
}

fn write_json(path: &Path, v: &Value) {
    fs::write(path, serde_json::to_string_pretty(v).unwrap()).unwrap();
}

#[test]
fn directory_of_files() {
    let root = tempfile::tempdir().unwrap();
    let models = root.path().join("models");
    fs::create_dir(&models).unwrap();
    write_json(&root.path().join("model_schema_v0.json"), &model_schema());
    write_json(&models.join("a_good.json"), &json!({"provider":"openai","model_name":"gpt5","modalities":{"text":true}}));
    write_json(&models.join("b_missing.json"), &json!({"provider":"openai","modalities":{"text":true}}));
    write_json(&models.join("c_nested.json"), &json!({"provider":"openai","model_name":"o3","modalities":{"text":"yes"}}));
    fs::write(models.join("d_broken.json"), "{\n  \"provider\": \"x\",\n  oops\n}").unwrap();

    let cfg = Config::discover(root.path()).unwrap();
    let validator = CatalogValidator::from_file(&cfg.schema_path()).unwrap();
    let report = validate_catalog(&validator, &CatalogShape::from_config(&cfg)).unwrap();

    assert_eq!(report.entries.len(), 4);
    assert_eq!(report.passed(), 1);
    assert!(report.get("a_good.json").unwrap().passed());

    let Outcome::Invalid(v) = &report.get("b_missing.json").unwrap().outcome else { panic!("expected violations") };
    assert!(v[0].path.iter().any(|p| *p == "model_name"));

    let Outcome::Invalid(v) = &report.get("c_nested.json").unwrap().outcome else { panic!("expected violations") };
    assert_eq!(v[0].joined_path("/"), "modalities/text");

    let Outcome::Malformed { line, .. } = &report.get("d_broken.json").unwrap().outcome else { panic!("expected malformed") };
    assert_eq!(*line, 3);

    let text = report.to_string();
    assert!(text.contains("   - modalities/text: "), "{text}");
    assert!(text.contains("❌ d_broken.json: invalid JSON - "), "{text}");
    assert!(text.ends_with("1 valid, 3 failed"));
}

#[test]
fn unreadable_file_is_reported_apart_from_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    write_json(&dir.path().join("good.json"), &json!({"provider":"openai","model_name":"gpt5","modalities":{"text":true}}));
    fs::write(dir.path().join("latin1.json"), b"{\"provider\": \"caf\xe9\"}").unwrap();
    let validator = CatalogValidator::new(model_schema()).unwrap();
    let shape = CatalogShape::DirectoryOfFiles { dir: dir.path().to_path_buf(), pattern: "*.json".into() };
    let report = validate_catalog(&validator, &shape).unwrap();

    assert_eq!(report.entries.len(), 2);
    assert!(report.get("good.json").unwrap().passed());
    assert!(matches!(report.get("latin1.json").unwrap().outcome, Outcome::Unreadable(_)));
    assert!(report.to_string().contains("❌ latin1.json: unreadable - "));
}

#[test]
fn nested_by_provider() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("programming_models.json");
    write_json(&path, &json!({
        "gpt5": {
            "openai": {"provider":"openai","model_name":"gpt5","modalities":{"text":true}},
            "azure": {"provider":"azure","model_name":"gpt5","modalities":{}}
        },
        "claude": {
            "anthropic": {"provider":"anthropic","model_name":"claude","modalities":{"text":true,"image":true}}
        }
    }));
    let validator = CatalogValidator::new(model_schema()).unwrap();
    let report = validate_catalog(&validator, &CatalogShape::NestedByProvider { path }).unwrap();

    assert_eq!(report.entries.len(), 3);
    assert!(report.get("gpt5 (openai)").unwrap().passed());
    assert!(report.get("claude (anthropic)").unwrap().passed());
    let Outcome::Invalid(v) = &report.get("gpt5 (azure)").unwrap().outcome else { panic!("expected violations") };
    assert_eq!(v.len(), 1);
    assert_eq!(v[0].joined_path("."), "modalities.text");
    assert!(report.to_string().contains("❌ Validation failed for gpt5 (azure):\n   - modalities.text: "));
}

fn flat_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": ["all_models"],
        "properties": {"all_models": {"type": "array", "items": {"type": "string"}}},
        "patternProperties": {
            ENTRY_PATTERN: {
                "type": "object",
                "required": ["providers"],
                "properties": {"providers": {"type": "array", "items": {"$ref": "#/$defs/provider"}}}
            }
        },
        "$defs": {
            "provider": {"type": "object", "required": ["name"], "properties": {"name": {"type": "string"}}}
        }
    })
}

#[test]
fn flat_file_with_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("programming_models_v1.json");
    write_json(&path, &json!({
        "all_models": ["gpt5", "claude", "ghost"],
        "gpt5": {"providers": [{"name": "openai"}]},
        "claude": {"providers": [{"label": "anthropic"}]}
    }));
    let validator = CatalogValidator::new(flat_schema()).unwrap();
    let shape = CatalogShape::FlatFile { path, index_key: "all_models".into(), entry_pattern: ENTRY_PATTERN.into() };
    let report = validate_catalog(&validator, &shape).unwrap();

    let labels: Vec<_> = report.entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, ["programming_models_v1.json", "gpt5", "claude", "ghost"]);
    assert!(!report.entries[0].passed(), "whole document sees the claude violation");
    assert!(report.get("gpt5").unwrap().passed());
    let Outcome::Invalid(v) = &report.get("claude").unwrap().outcome else { panic!("expected violations") };
    assert_eq!(v[0].joined_path("."), "providers.0.name");
    assert_eq!(report.get("ghost").unwrap().outcome, Outcome::NotFound);
}

#[test]
fn flat_file_without_index_checks_document_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("models.json");
    write_json(&path, &json!({"gpt5": {"providers": []}}));
    let validator = CatalogValidator::new(flat_schema()).unwrap();
    let shape = CatalogShape::FlatFile { path, index_key: "all_models".into(), entry_pattern: ENTRY_PATTERN.into() };
    let report = validate_catalog(&validator, &shape).unwrap();
    assert_eq!(report.entries.len(), 1);
    let Outcome::Invalid(v) = &report.entries[0].outcome else { panic!("expected violations") };
    assert_eq!(v[0].path, ["all_models"]);
}

#[test]
fn malformed_single_document_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("programming_models.json");
    fs::write(&path, "{\"gpt5\": }").unwrap();
    let validator = CatalogValidator::new(model_schema()).unwrap();
    let err = validate_catalog(&validator, &CatalogShape::NestedByProvider { path }).unwrap_err();
    let CatalogError::Json { line, column, .. } = err else { panic!("expected json error") };
    assert_eq!((line, column), (1, 10));
}

#[test]
fn shape_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = Config::discover(dir.path()).unwrap();
    cfg.validate.shape = ShapeKind::FlatFile;
    assert_eq!(
        CatalogShape::from_config(&cfg),
        CatalogShape::FlatFile {
            path: dir.path().join("programming_models_v1.json"),
            index_key: "all_models".into(),
            entry_pattern: ENTRY_PATTERN.into(),
        }
    );
}
