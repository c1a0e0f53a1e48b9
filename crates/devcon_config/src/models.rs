//! devcontainer.json data model.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::jsonc::strip_jsonc;

/// Directory holding the descriptor, relative to the project folder.
pub const DEVCONTAINER_DIR: &str = ".devcontainer";

/// Descriptor file name inside [`DEVCONTAINER_DIR`].
pub const DEVCONTAINER_FILE: &str = "devcontainer.json";

/// Default user when `remoteUser` is not set.
pub const DEFAULT_REMOTE_USER: &str = "root";

/// Parent of the default in-container workspace folder.
pub const DEFAULT_WORKSPACES_ROOT: &str = "/workspaces";

/// The `build` section of a devcontainer.json.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Dockerfile path, relative to `.devcontainer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
    /// Build context, relative to `.devcontainer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Build arguments, in document order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub args: IndexMap<String, String>,
}

/// The subset of devcontainer.json that devcon reads.
///
/// Keys not modelled here are ignored on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevcontainerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildConfig>,

    /// Legacy top-level Dockerfile (pre-`build` schema)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_file: Option<String>,

    /// Legacy top-level build context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Mounts in `key=value,...` form. Object entries are rendered to it.
    #[serde(
        default,
        deserialize_with = "deserialize_mounts",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub mounts: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_args: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_folder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_user: Option<String>,
}

/// A `mounts` entry: either the engine's string form or the object form.
#[derive(Deserialize)]
#[serde(untagged)]
enum MountEntry {
    Spec(String),
    Object {
        #[serde(rename = "type", default)]
        mount_type: Option<String>,
        #[serde(default)]
        source: Option<String>,
        target: String,
    },
}

impl MountEntry {
    fn into_spec(self) -> String {
        match self {
            MountEntry::Spec(spec) => spec,
            MountEntry::Object {
                mount_type,
                source,
                target,
            } => {
                let mut parts = Vec::with_capacity(3);
                if let Some(mount_type) = mount_type {
                    parts.push(format!("type={}", mount_type));
                }
                if let Some(source) = source {
                    parts.push(format!("source={}", source));
                }
                parts.push(format!("target={}", target));
                parts.join(",")
            }
        }
    }
}

fn deserialize_mounts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<MountEntry>::deserialize(deserializer)?;
    Ok(entries.into_iter().map(MountEntry::into_spec).collect())
}

impl DevcontainerConfig {
    /// Path of the descriptor for a project folder.
    pub fn path_for(folder: impl AsRef<Path>) -> std::path::PathBuf {
        folder
            .as_ref()
            .join(DEVCONTAINER_DIR)
            .join(DEVCONTAINER_FILE)
    }

    /// Load `<folder>/.devcontainer/devcontainer.json`.
    pub fn load_for_folder(folder: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::load_from_file(Self::path_for(folder))
    }

    /// Load a descriptor from a file.
    pub fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("Reading devcontainer config from {:?}", path);

        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io(e),
        })?;

        Self::load_from_str(&content).map_err(|e| match e {
            ConfigError::Json(err) => ConfigError::InvalidFormat {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
            other => other,
        })
    }

    /// Parse a descriptor from JSONC text.
    pub fn load_from_str(content: &str) -> ConfigResult<Self> {
        let config = serde_json::from_str(&strip_jsonc(content))?;
        Ok(config)
    }

    /// Configured Dockerfile, preferring `build.dockerfile`.
    pub fn dockerfile(&self) -> Option<&str> {
        self.build
            .as_ref()
            .and_then(|b| b.dockerfile.as_deref())
            .or(self.docker_file.as_deref())
    }

    /// Configured build context, preferring `build.context`.
    pub fn context(&self) -> Option<&str> {
        self.build
            .as_ref()
            .and_then(|b| b.context.as_deref())
            .or(self.context.as_deref())
    }

    /// Build arguments in document order.
    pub fn build_args(&self) -> impl Iterator<Item = (&str, &str)> {
        self.build
            .iter()
            .flat_map(|b| b.args.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// In-container workspace folder.
    ///
    /// Defaults to `/workspaces/<basename of repo_path>`.
    pub fn workspace_folder(&self, repo_path: impl AsRef<Path>) -> String {
        if let Some(folder) = &self.workspace_folder {
            return folder.clone();
        }
        match repo_path.as_ref().file_name() {
            Some(name) => format!("{}/{}", DEFAULT_WORKSPACES_ROOT, name.to_string_lossy()),
            None => DEFAULT_WORKSPACES_ROOT.to_string(),
        }
    }

    /// User the container runs as, `root` unless configured.
    pub fn remote_user(&self) -> &str {
        self.remote_user.as_deref().unwrap_or(DEFAULT_REMOTE_USER)
    }
}
