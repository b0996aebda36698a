//! CLI binary integration tests using assert_cmd + predicates.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("swagmod").expect("binary should exist")
}

fn search_document() -> String {
    serde_json::json!({
        "swagger": "2.0",
        "definitions": {
            "Criteria": {
                "type": "object",
                "properties": { "q": { "type": "string" } }
            },
            "Unused": { "type": "object" }
        },
        "paths": {
            "/search": {
                "get": {
                    "parameters": [
                        { "name": "criteria", "in": "body", "schema": { "$ref": "#/definitions/Criteria" } }
                    ]
                }
            }
        }
    })
    .to_string()
}

#[test]
fn test_missing_required_args_fails() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input"));
}

#[test]
fn test_end_to_end_rename_and_prune() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("api.json");
    let output = dir.path().join("out/api.modified.json");
    let config = dir.path().join("mapping.json");
    fs::write(&input, search_document()).unwrap();
    fs::write(&config, serde_json::json!({ "prefix": "FOS" }).to_string()).unwrap();

    cmd()
        .args(["--input", input.to_str().unwrap()])
        .args(["--output", output.to_str().unwrap()])
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success();

    // Parent directory was created; output is pretty-printed JSON with a
    // trailing newline.
    let content = fs::read_to_string(&output).unwrap();
    assert!(content.ends_with('\n'));
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(doc["definitions"].get("FOSCriteria").is_some());
    assert!(doc["definitions"].get("Criteria").is_none());
    assert!(doc["definitions"].get("Unused").is_none());
}

#[test]
fn test_generator_config_emitted() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("api.json");
    let output = dir.path().join("api.modified.json");
    let generator = dir.path().join("openapi-config.json");
    fs::write(&input, search_document()).unwrap();

    cmd()
        .args(["--input", input.to_str().unwrap()])
        .args(["--output", output.to_str().unwrap()])
        .args([
            "--open-api-config-output-path",
            generator.to_str().unwrap(),
        ])
        .assert()
        .success();

    let config: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&generator).unwrap()).unwrap();
    assert_eq!(
        config["additionalProperties"]["customNames"]["criteria"],
        serde_json::json!("Criteria")
    );
}

#[test]
fn test_existing_generator_config_keeps_unmanaged_keys() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("api.json");
    let output = dir.path().join("api.modified.json");
    let generator = dir.path().join("openapi-config.json");
    fs::write(&input, search_document()).unwrap();
    fs::write(
        &generator,
        serde_json::json!({ "library": "reqwest" }).to_string(),
    )
    .unwrap();

    cmd()
        .args(["--input", input.to_str().unwrap()])
        .args(["--output", output.to_str().unwrap()])
        .args([
            "--open-api-config-output-path",
            generator.to_str().unwrap(),
        ])
        .assert()
        .success();

    let config: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&generator).unwrap()).unwrap();
    assert_eq!(config["library"], serde_json::json!("reqwest"));
    assert!(config["additionalProperties"]["customNames"].is_object());
}

#[test]
fn test_invalid_input_json_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.json");
    let output = dir.path().join("out.json");
    fs::write(&input, "{ not json").unwrap();

    cmd()
        .args(["--input", input.to_str().unwrap()])
        .args(["--output", output.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse JSON"));
}

#[test]
fn test_strict_mode_fails_on_dangling_ref() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("api.json");
    let output = dir.path().join("out.json");
    fs::write(
        &input,
        serde_json::json!({
            "paths": {
                "/x": {
                    "get": {
                        "responses": { "200": { "schema": { "$ref": "#/definitions/Ghost" } } }
                    }
                }
            }
        })
        .to_string(),
    )
    .unwrap();

    cmd()
        .args(["--input", input.to_str().unwrap()])
        .args(["--output", output.to_str().unwrap()])
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("dangling"));

    // Lenient (default) succeeds on the same input.
    cmd()
        .args(["--input", input.to_str().unwrap()])
        .args(["--output", output.to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn test_invalid_mapping_config_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("api.json");
    let output = dir.path().join("out.json");
    let config = dir.path().join("mapping.json");
    fs::write(&input, search_document()).unwrap();
    // A path override must map methods to objects, not to a bare string.
    fs::write(
        &config,
        serde_json::json!({ "/search": { "get": "FOS" } }).to_string(),
    )
    .unwrap();

    cmd()
        .args(["--input", input.to_str().unwrap()])
        .args(["--output", output.to_str().unwrap()])
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid rename mapping"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("swagmod"));
}
