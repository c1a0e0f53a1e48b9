//! Argument vector assembly for engine invocations.
//!
//! These builders are pure: they take resolved values and return the exact,
//! ordered argument list handed to the engine CLI.

use std::path::{Path, PathBuf};

/// Tag used for every image devcon builds, runs and pushes.
pub const IMAGE_TAG: &str = "latest";

/// Runs before the user command to hand the bind-mounted workspace to the
/// container user.
// TODO: replace with UID/GID alignment between host and container user
pub const CHOWN_PREFIX: &str = "sudo chown -R $(whoami) .";

/// `<image>:latest`
pub fn image_ref(image_name: &str) -> String {
    format!("{}:{}", image_name, IMAGE_TAG)
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Inputs of a `buildx build` invocation.
#[derive(Debug, Clone)]
pub struct BuildInvocation {
    pub image_name: String,
    /// `(name, substituted value)` pairs in config order
    pub build_args: Vec<(String, String)>,
    pub dockerfile_path: PathBuf,
    pub context_path: PathBuf,
}

impl BuildInvocation {
    pub fn to_args(&self) -> Vec<String> {
        let image = image_ref(&self.image_name);
        let mut args = vec![
            "buildx".to_string(),
            "build".to_string(),
            "--tag".to_string(),
            image.clone(),
            "--cache-from".to_string(),
            format!("type=registry,ref={}", image),
            "--cache-to".to_string(),
            "type=inline".to_string(),
            "--output=type=docker".to_string(),
        ];

        for (name, value) in &self.build_args {
            args.push("--build-arg".to_string());
            args.push(format!("{}={}", name, value));
        }

        args.push("-f".to_string());
        args.push(path_arg(&self.dockerfile_path));
        // context must stay last
        args.push(path_arg(&self.context_path));
        args
    }
}

/// Inputs of a `run` invocation.
#[derive(Debug, Clone)]
pub struct RunInvocation {
    pub image_name: String,
    /// Absolute host path bind-mounted as the workspace
    pub checkout_path: PathBuf,
    pub workspace_folder: String,
    pub remote_user: String,
    /// Validated, substituted `--mount` values
    pub mounts: Vec<String>,
    /// Substituted extra engine arguments
    pub run_args: Vec<String>,
    /// `KEY=VALUE` entries
    pub envs: Vec<String>,
    pub command: String,
}

impl RunInvocation {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "--mount".to_string(),
            format!(
                "type=bind,src={},dst={}",
                path_arg(&self.checkout_path),
                self.workspace_folder
            ),
        ];

        for mount in &self.mounts {
            args.push("--mount".to_string());
            args.push(mount.clone());
        }

        args.push("--workdir".to_string());
        args.push(self.workspace_folder.clone());
        args.push("--user".to_string());
        args.push(self.remote_user.clone());

        args.extend(self.run_args.iter().cloned());

        for env in &self.envs {
            args.push("--env".to_string());
            args.push(env.clone());
        }

        args.push(image_ref(&self.image_name));
        args.push("bash".to_string());
        args.push("-c".to_string());
        args.push(format!("{} && {}", CHOWN_PREFIX, self.command));
        args
    }
}

/// `push <image>:latest`
pub fn push_args(image_name: &str) -> Vec<String> {
    vec!["push".to_string(), image_ref(image_name)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_args_exact_order() {
        let invocation = BuildInvocation {
            image_name: "ghcr.io/acme/dev".to_string(),
            build_args: vec![
                ("VARIANT".to_string(), "bullseye".to_string()),
                ("USER".to_string(), "dev".to_string()),
            ],
            dockerfile_path: PathBuf::from("/repo/.devcontainer/Dockerfile"),
            context_path: PathBuf::from("/repo/.devcontainer"),
        };

        assert_eq!(
            invocation.to_args(),
            strings(&[
                "buildx",
                "build",
                "--tag",
                "ghcr.io/acme/dev:latest",
                "--cache-from",
                "type=registry,ref=ghcr.io/acme/dev:latest",
                "--cache-to",
                "type=inline",
                "--output=type=docker",
                "--build-arg",
                "VARIANT=bullseye",
                "--build-arg",
                "USER=dev",
                "-f",
                "/repo/.devcontainer/Dockerfile",
                "/repo/.devcontainer",
            ])
        );
    }

    #[test]
    fn test_build_without_args() {
        let invocation = BuildInvocation {
            image_name: "img".to_string(),
            build_args: Vec::new(),
            dockerfile_path: PathBuf::from("Dockerfile"),
            context_path: PathBuf::from("."),
        };
        let args = invocation.to_args();
        assert!(!args.contains(&"--build-arg".to_string()));
        assert_eq!(args[args.len() - 3..], strings(&["-f", "Dockerfile", "."])[..]);
    }

    #[test]
    fn test_run_args_exact_order() {
        let invocation = RunInvocation {
            image_name: "img".to_string(),
            checkout_path: PathBuf::from("/home/me/repo"),
            workspace_folder: "/workspaces/repo".to_string(),
            remote_user: "vscode".to_string(),
            mounts: strings(&["type=volume,src=cache,dst=/cache"]),
            run_args: strings(&["--init", "--network=host"]),
            envs: strings(&["CI=true"]),
            command: "make test".to_string(),
        };

        assert_eq!(
            invocation.to_args(),
            strings(&[
                "run",
                "--mount",
                "type=bind,src=/home/me/repo,dst=/workspaces/repo",
                "--mount",
                "type=volume,src=cache,dst=/cache",
                "--workdir",
                "/workspaces/repo",
                "--user",
                "vscode",
                "--init",
                "--network=host",
                "--env",
                "CI=true",
                "img:latest",
                "bash",
                "-c",
                "sudo chown -R $(whoami) . && make test",
            ])
        );
    }

    #[test]
    fn test_push_args() {
        assert_eq!(push_args("img"), strings(&["push", "img:latest"]));
    }
}
