//! Integration tests for loading devcontainer descriptors from disk.

use std::fs;
use tempfile::tempdir;

use devcon_config::{ConfigError, DevcontainerConfig, Substitutor};

fn write_descriptor(root: &std::path::Path, content: &str) {
    let dir = root.join(".devcontainer");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("devcontainer.json"), content).unwrap();
}

/// Test loading a descriptor from a project folder.
#[test]
fn test_load_for_folder() {
    let temp = tempdir().unwrap();
    write_descriptor(
        temp.path(),
        r#"{
    "build": { "dockerfile": "Dockerfile", "args": { "USER_NAME": "${localEnv:USER_NAME}" } },
    /* extra mounts */
    "mounts": ["source=${localWorkspaceFolder}/.cache,target=/cache,type=bind"],
}"#,
    );

    let config = DevcontainerConfig::load_for_folder(temp.path()).unwrap();
    assert_eq!(config.dockerfile(), Some("Dockerfile"));

    let subst = Substitutor::new()
        .with_var("USER_NAME", "dev")
        .with_local_workspace_folder(temp.path());

    let args: Vec<String> = config
        .build_args()
        .map(|(k, v)| format!("{}={}", k, subst.substitute(v)))
        .collect();
    assert_eq!(args, vec!["USER_NAME=dev".to_string()]);

    let mount = subst.substitute(&config.mounts[0]);
    assert!(mount.starts_with(&format!("source={}/.cache", temp.path().display())));
}

/// Test a missing descriptor is reported with its path.
#[test]
fn test_missing_descriptor() {
    let temp = tempdir().unwrap();

    match DevcontainerConfig::load_for_folder(temp.path()) {
        Err(ConfigError::NotFound(path)) => {
            assert!(path.ends_with(".devcontainer/devcontainer.json"));
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

/// Test malformed JSON is reported with the offending file.
#[test]
fn test_malformed_descriptor() {
    let temp = tempdir().unwrap();
    write_descriptor(temp.path(), "{ \"build\": ");

    match DevcontainerConfig::load_for_folder(temp.path()) {
        Err(ConfigError::InvalidFormat { path, message }) => {
            assert!(path.ends_with("devcontainer.json"));
            assert!(!message.is_empty());
        }
        other => panic!("Expected InvalidFormat, got {:?}", other),
    }
}
