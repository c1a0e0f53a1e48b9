//! # devcon_config
//!
//! Loading of `.devcontainer/devcontainer.json` descriptors and
//! substitution of `${...}` placeholders in their values.
//!
//! ## Example
//!
//! ```rust,no_run
//! use devcon_config::{DevcontainerConfig, Substitutor};
//!
//! let config = DevcontainerConfig::load_for_folder("./my-repo").unwrap();
//! let subst = Substitutor::from_env();
//!
//! for (name, value) in config.build_args() {
//!     println!("{}={}", name, subst.substitute(value));
//! }
//! ```

pub mod error;
pub mod jsonc;
pub mod models;
pub mod substitute;

pub use error::{ConfigError, ConfigResult};
pub use models::{
    BuildConfig, DevcontainerConfig, DEFAULT_REMOTE_USER, DEFAULT_WORKSPACES_ROOT,
    DEVCONTAINER_DIR, DEVCONTAINER_FILE,
};
pub use substitute::Substitutor;
