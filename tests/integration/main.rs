//! Integration tests for Solflat
//!
//! These tests drive the CLI and the host session end to end.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use serde_json::json;
use solflat_core::FileKey;
use solflat_host::{CompilationFinished, Config, FlattenSession, LocalHost, StatusKey};
use tempfile::TempDir;

/// Token imports Ownable and a package ERC20; both pull in a Context.
fn event_json() -> serde_json::Value {
    json!({
        "file": "browser/Token.sol",
        "languageVersion": "0.8.24",
        "source": {
            "target": "browser/Token.sol",
            "sources": {
                "browser/Token.sol": {"content": "pragma solidity ^0.8.0;\nimport \"./access/Ownable.sol\";\nimport \"lib/ERC20.sol\";\n\ncontract Token is ERC20, Ownable {}\n"},
                "browser/access/Ownable.sol": {"content": "pragma solidity ^0.8.0;\nimport \"../Context.sol\";\n\nabstract contract Ownable is Context {}\n"},
                "browser/Context.sol": {"content": "pragma solidity ^0.8.0;\n\nabstract contract Context {}\n"},
                "lib/ERC20.sol": {"content": "pragma solidity ^0.8.0;\nimport \"../browser/Context.sol\";\n\ncontract ERC20 is Context {}\n"}
            }
        },
        "data": {
            "sources": {
                "browser/Token.sol": {"ast": {"nodes": [
                    {"nodeType": "PragmaDirective"},
                    {"nodeType": "ImportDirective", "file": "./access/Ownable.sol"},
                    {"nodeType": "ImportDirective", "file": "lib/ERC20.sol"},
                    {"nodeType": "ContractDefinition"}
                ]}},
                "browser/access/Ownable.sol": {"ast": {"nodes": [
                    {"nodeType": "ImportDirective", "file": "../Context.sol"}
                ]}},
                "browser/Context.sol": {"ast": {"nodes": []}},
                "lib/ERC20.sol": {"ast": {"nodes": [
                    {"nodeType": "ImportDirective", "file": "../browser/Context.sol"}
                ]}}
            }
        }
    })
}

fn write_event(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("compilation.json");
    std::fs::write(&path, serde_json::to_string_pretty(&event_json()).unwrap()).unwrap();
    path
}

fn solflat(root: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_solflat"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("Failed to execute solflat")
}

const EXPECTED_ORDER: [&str; 4] = [
    "browser/Context.sol",
    "browser/access/Ownable.sol",
    "lib/ERC20.sol",
    "browser/Token.sol",
];

/// Test that the CLI reports its version
#[test]
fn test_cli_version() {
    let temp_dir = TempDir::new().unwrap();
    let output = solflat(temp_dir.path(), &["version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Solflat v"));
}

/// Test flattening through the CLI: stdout, saved file, and clipboard file
#[test]
fn test_cli_flatten() {
    let temp_dir = TempDir::new().unwrap();
    let event = write_event(temp_dir.path());
    let clipboard = temp_dir.path().join("clipboard.txt");

    let output = solflat(
        temp_dir.path(),
        &[
            "flatten",
            event.to_str().unwrap(),
            "--stdout",
            "--clipboard",
            clipboard.to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let markers: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.strip_prefix("// File: "))
        .collect();
    assert_eq!(markers, EXPECTED_ORDER);
    assert!(!stdout.lines().any(|line| line.trim_start().starts_with("import ")));

    let saved = std::fs::read_to_string(temp_dir.path().join("browser/Token_flat.sol")).unwrap();
    assert_eq!(saved, stdout);
    assert_eq!(std::fs::read_to_string(&clipboard).unwrap(), stdout);
}

/// Test that --no-save leaves the root untouched
#[test]
fn test_cli_flatten_no_save() {
    let temp_dir = TempDir::new().unwrap();
    let event = write_event(temp_dir.path());

    let output = solflat(temp_dir.path(), &["flatten", event.to_str().unwrap(), "--no-save"]);
    assert!(output.status.success());
    assert!(!temp_dir.path().join("browser").exists());
}

/// Test that solflat.toml changes the output location
#[test]
fn test_cli_respects_config() {
    let temp_dir = TempDir::new().unwrap();
    let event = write_event(temp_dir.path());
    std::fs::write(
        temp_dir.path().join("solflat.toml"),
        "[output]\ndirectory = \"flat\"\nsuffix = \".flattened\"\n",
    )
    .unwrap();

    let output = solflat(temp_dir.path(), &["flatten", event.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(temp_dir.path().join("flat/Token.flattened.sol").exists());
}

/// Test the order command
#[test]
fn test_cli_order() {
    let temp_dir = TempDir::new().unwrap();
    let event = write_event(temp_dir.path());

    let output = solflat(temp_dir.path(), &["order", event.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let listed: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split_once(". ").map(|(_, key)| key))
        .collect();
    assert_eq!(listed, EXPECTED_ORDER);
}

/// Test that a malformed event fails the command
#[test]
fn test_cli_malformed_event() {
    let temp_dir = TempDir::new().unwrap();
    let event = temp_dir.path().join("compilation.json");
    std::fs::write(&event, "{not json").unwrap();

    let output = solflat(temp_dir.path(), &["flatten", event.to_str().unwrap()]);
    assert!(!output.status.success());
}

/// Test the session against the local host without the CLI
#[test]
fn test_session_with_local_host() {
    let temp_dir = TempDir::new().unwrap();
    let host = Arc::new(LocalHost::new(temp_dir.path()));
    let session = FlattenSession::with_config(Arc::clone(&host), Config::default());
    let event = CompilationFinished::from_json(&event_json().to_string()).unwrap();

    let flattened = tokio_test::block_on(async {
        session.on_compilation_finished(event).await.unwrap();
        session.flatten().await.unwrap()
    });

    let order: Vec<&str> = flattened.order.iter().map(FileKey::as_str).collect();
    assert_eq!(order, EXPECTED_ORDER);
    assert!(flattened.cycles.is_empty());

    let keys: Vec<StatusKey> = host.status_history().into_iter().map(|r| r.status.key).collect();
    assert_eq!(keys, vec![StatusKey::None, StatusKey::Succeed]);

    let path = tokio_test::block_on(session.save()).unwrap();
    assert_eq!(path, "browser/Token_flat.sol");
}
