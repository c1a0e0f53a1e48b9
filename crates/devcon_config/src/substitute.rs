//! Placeholder substitution for devcontainer.json values.
//!
//! Supported placeholders:
//!
//! - `${localEnv:NAME}` / `${env:NAME}` - host environment variable, empty
//!   when unset (the type prefix is case-insensitive)
//! - `${localWorkspaceFolder}` - absolute host path of the project folder
//! - `${localWorkspaceFolderBasename}` - its last path component
//!
//! Anything else is left verbatim.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // non-greedy so adjacent placeholders are matched separately
    PATTERN.get_or_init(|| Regex::new(r"\$\{(.+?)\}").expect("placeholder pattern is valid"))
}

/// Substitutes `${...}` placeholders against a snapshot of the host
/// environment.
#[derive(Debug, Clone, Default)]
pub struct Substitutor {
    env: HashMap<String, String>,
    local_workspace_folder: Option<PathBuf>,
}

impl Substitutor {
    /// A substitutor with no environment variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    pub fn from_env() -> Self {
        Self {
            env: std::env::vars().collect(),
            local_workspace_folder: None,
        }
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_local_workspace_folder(mut self, folder: impl AsRef<Path>) -> Self {
        self.local_workspace_folder = Some(folder.as_ref().to_path_buf());
        self
    }

    /// Replace every recognised placeholder in `input`.
    pub fn substitute(&self, input: &str) -> String {
        placeholder_pattern()
            .replace_all(input, |caps: &Captures| self.resolve(&caps[0], &caps[1]))
            .into_owned()
    }

    fn resolve(&self, matched: &str, placeholder: &str) -> String {
        let parts: Vec<&str> = placeholder.split(':').collect();
        if let [kind, key] = parts.as_slice() {
            match kind.to_ascii_lowercase().as_str() {
                "env" | "localenv" => return self.env.get(*key).cloned().unwrap_or_default(),
                _ => {}
            }
        }

        if let Some(folder) = &self.local_workspace_folder {
            match placeholder {
                "localWorkspaceFolder" => return folder.to_string_lossy().into_owned(),
                "localWorkspaceFolderBasename" => {
                    return folder
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                }
                _ => {}
            }
        }

        matched.to_string()
    }
}
