//! Build, run and push orchestration.
//!
//! Each operation loads the project's devcontainer.json, assembles the
//! engine arguments and awaits exactly one engine process.

use std::path::{Path, PathBuf};

use devcon_config::{DevcontainerConfig, Substitutor, DEVCONTAINER_DIR};
use devcon_runner::{ContainerEngine, ProcessRunner};
use tracing::{debug, info, warn};

use crate::args::{image_ref, push_args, BuildInvocation, RunInvocation};
use crate::error::{DevconError, DevconResult, Operation};
use crate::mount::parse_mount;

/// Caller-supplied inputs of [`DevContainerCli::run_container`].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Shell command run inside the container after the ownership fix-up
    pub command: String,
    /// `KEY=VALUE` entries passed as `--env`
    pub envs: Vec<String>,
    /// Accepted for interface compatibility but not consulted: only mounts
    /// declared in devcontainer.json are applied.
    pub mounts: Vec<String>,
}

impl RunOptions {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn env(mut self, entry: impl Into<String>) -> Self {
        self.envs.push(entry.into());
        self
    }

    pub fn envs(mut self, entries: Vec<String>) -> Self {
        self.envs.extend(entries);
        self
    }

    pub fn mount(mut self, mount: impl Into<String>) -> Self {
        self.mounts.push(mount.into());
        self
    }
}

/// Drives a container engine CLI for dev container images.
pub struct DevContainerCli<R> {
    runner: R,
    engine: ContainerEngine,
    substitutor: Substitutor,
}

impl<R: ProcessRunner> DevContainerCli<R> {
    /// Create an orchestrator substituting against the current environment.
    pub fn new(runner: R, engine: ContainerEngine) -> Self {
        Self {
            runner,
            engine,
            substitutor: Substitutor::from_env(),
        }
    }

    pub fn with_substitutor(mut self, substitutor: Substitutor) -> Self {
        self.substitutor = substitutor;
        self
    }

    pub fn engine(&self) -> ContainerEngine {
        self.engine
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Whether `<engine> buildx` is usable.
    pub async fn is_buildx_installed(&self) -> DevconResult<bool> {
        let args = vec!["buildx".to_string(), "--help".to_string()];
        let result = self.runner.exec(self.engine.command(), &args).await?;
        Ok(result.success())
    }

    /// Fail with [`DevconError::BuildxNotInstalled`] unless buildx is usable.
    pub async fn ensure_buildx(&self) -> DevconResult<()> {
        if !self.is_buildx_installed().await? {
            return Err(DevconError::BuildxNotInstalled(self.engine));
        }
        Ok(())
    }

    /// Build `<image_name>:latest` from the project's Dockerfile.
    pub async fn build_image(
        &self,
        image_name: &str,
        checkout_path: impl AsRef<Path>,
        sub_folder: &str,
    ) -> DevconResult<()> {
        let folder = resolve_folder(checkout_path.as_ref(), sub_folder);
        let config_path = DevcontainerConfig::path_for(&folder);
        let config = DevcontainerConfig::load_from_file(&config_path)?;

        let dockerfile = config
            .dockerfile()
            .ok_or_else(|| DevconError::DockerfileNotConfigured(config_path.clone()))?;

        let devcontainer_dir = folder.join(DEVCONTAINER_DIR);
        let dockerfile_path = devcontainer_dir.join(dockerfile);
        let context_path = match config.context().unwrap_or_default() {
            "" => devcontainer_dir,
            context => devcontainer_dir.join(context),
        };

        let substitutor = self.substitutor_for(&folder);
        let invocation = BuildInvocation {
            image_name: image_name.to_string(),
            build_args: config
                .build_args()
                .map(|(name, value)| (name.to_string(), substitutor.substitute(value)))
                .collect(),
            dockerfile_path,
            context_path,
        };

        info!("Building image {} from {:?}", image_ref(image_name), invocation.dockerfile_path);
        self.exec(Operation::Build, invocation.to_args()).await?;
        info!("Image {} built", image_ref(image_name));
        Ok(())
    }

    /// Run `options.command` inside `<image_name>:latest` with the checkout
    /// bind-mounted as the workspace.
    pub async fn run_container(
        &self,
        image_name: &str,
        checkout_path: impl AsRef<Path>,
        sub_folder: &str,
        options: &RunOptions,
    ) -> DevconResult<()> {
        let checkout_path = absolute_checkout(checkout_path.as_ref())?;
        let folder = resolve_folder(&checkout_path, sub_folder);
        let config = DevcontainerConfig::load_for_folder(&folder)?;

        if !options.mounts.is_empty() {
            debug!(
                count = options.mounts.len(),
                "Ignoring caller-supplied mounts; only devcontainer.json mounts are applied"
            );
        }

        let substitutor = self.substitutor_for(&folder);
        let invocation = RunInvocation {
            image_name: image_name.to_string(),
            workspace_folder: config.workspace_folder(&checkout_path),
            remote_user: config.remote_user().to_string(),
            mounts: select_mounts(&config, &substitutor)?,
            run_args: config
                .run_args
                .iter()
                .map(|arg| substitutor.substitute(arg))
                .collect(),
            envs: options.envs.clone(),
            command: options.command.clone(),
            checkout_path,
        };

        info!(
            "Running {} in {} as {}",
            image_ref(image_name),
            invocation.workspace_folder,
            invocation.remote_user
        );
        self.exec(Operation::Run, invocation.to_args()).await
    }

    /// Push `<image_name>:latest`.
    pub async fn push_image(&self, image_name: &str) -> DevconResult<()> {
        info!("Pushing image {}", image_ref(image_name));
        self.exec(Operation::Push, push_args(image_name)).await?;
        info!("Image {} pushed", image_ref(image_name));
        Ok(())
    }

    fn substitutor_for(&self, folder: &Path) -> Substitutor {
        let local = std::path::absolute(folder).unwrap_or_else(|_| folder.to_path_buf());
        self.substitutor.clone().with_local_workspace_folder(local)
    }

    async fn exec(&self, operation: Operation, args: Vec<String>) -> DevconResult<()> {
        let result = self.runner.exec(self.engine.command(), &args).await?;
        if !result.success() {
            return Err(DevconError::ProcessFailed {
                operation,
                exit_code: result.exit_code,
            });
        }
        Ok(())
    }
}

/// An empty checkout path is the current directory.
fn absolute_checkout(checkout_path: &Path) -> std::io::Result<PathBuf> {
    if checkout_path.as_os_str().is_empty() {
        std::env::current_dir()
    } else {
        std::path::absolute(checkout_path)
    }
}

fn resolve_folder(checkout_path: &Path, sub_folder: &str) -> PathBuf {
    if sub_folder.is_empty() {
        checkout_path.to_path_buf()
    } else {
        checkout_path.join(sub_folder)
    }
}

/// Substitute and validate the config's mounts.
///
/// Bind mounts whose source is missing on the host are dropped with a
/// warning; every other mount is kept in its substituted string form.
fn select_mounts(
    config: &DevcontainerConfig,
    substitutor: &Substitutor,
) -> DevconResult<Vec<String>> {
    let mut selected = Vec::with_capacity(config.mounts.len());

    for raw in &config.mounts {
        let mount = substitutor.substitute(raw);
        let parsed = parse_mount(&mount)?;

        if parsed.is_bind() && !Path::new(&parsed.source).exists() {
            warn!(
                mount = %parsed,
                source = %parsed.source,
                "Skipping mount as source does not exist"
            );
            continue;
        }

        selected.push(mount);
    }

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use devcon_runner::{ExecutionResult, RunnerResult};
    use mockall::mock;
    use std::fs;
    use tempfile::tempdir;

    mock! {
        pub Engine {}

        #[async_trait]
        impl ProcessRunner for Engine {
            async fn exec(&self, command: &str, args: &[String]) -> RunnerResult<ExecutionResult>;
        }
    }

    fn project(descriptor: &str) -> tempfile::TempDir {
        let temp = tempdir().unwrap();
        let dir = temp.path().join(".devcontainer");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("devcontainer.json"), descriptor).unwrap();
        temp
    }

    #[tokio::test]
    async fn test_build_without_dockerfile_never_invokes_runner() {
        let temp = project(r#"{ "image": "mcr.microsoft.com/devcontainers/base" }"#);

        let mut runner = MockEngine::new();
        runner.expect_exec().never();

        let cli = DevContainerCli::new(runner, ContainerEngine::Docker)
            .with_substitutor(Substitutor::new());
        let err = cli.build_image("img", temp.path(), "").await.unwrap_err();

        assert!(matches!(err, DevconError::DockerfileNotConfigured(_)));
        assert!(err.to_string().contains("Dockerfile-based"));
    }

    #[tokio::test]
    async fn test_invalid_mount_never_invokes_runner() {
        let temp = project(r#"{ "mounts": ["type=bind,consistency=cached"] }"#);

        let mut runner = MockEngine::new();
        runner.expect_exec().never();

        let cli = DevContainerCli::new(runner, ContainerEngine::Docker)
            .with_substitutor(Substitutor::new());
        let err = cli
            .run_container("img", temp.path(), "", &RunOptions::new("true"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("consistency"));
    }

    #[tokio::test]
    async fn test_push_uses_engine_command() {
        let mut runner = MockEngine::new();
        runner
            .expect_exec()
            .withf(|command, args| command == "podman" && args.to_vec() == push_args("img"))
            .times(1)
            .returning(|_, _| Ok(ExecutionResult::new(0, 5)));

        let cli = DevContainerCli::new(runner, ContainerEngine::Podman);
        cli.push_image("img").await.unwrap();
    }

    #[tokio::test]
    async fn test_buildx_detection() {
        let mut runner = MockEngine::new();
        runner
            .expect_exec()
            .withf(|_, args| args.first().map(String::as_str) == Some("buildx"))
            .times(1)
            .returning(|_, _| Ok(ExecutionResult::new(1, 0)));

        let cli = DevContainerCli::new(runner, ContainerEngine::Docker);
        assert!(!cli.is_buildx_installed().await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_buildx_names_engine() {
        let mut runner = MockEngine::new();
        runner
            .expect_exec()
            .withf(|command, _| command == "podman")
            .times(1)
            .returning(|_, _| Ok(ExecutionResult::new(125, 0)));

        let cli = DevContainerCli::new(runner, ContainerEngine::Podman);
        let err = cli.ensure_buildx().await.unwrap_err();
        assert!(matches!(
            err,
            DevconError::BuildxNotInstalled(ContainerEngine::Podman)
        ));
    }

    #[test]
    fn test_resolve_folder() {
        assert_eq!(resolve_folder(Path::new("/repo"), ""), PathBuf::from("/repo"));
        assert_eq!(
            resolve_folder(Path::new("/repo"), "services/api"),
            PathBuf::from("/repo/services/api")
        );
    }

    #[test]
    fn test_empty_checkout_path_is_current_dir() {
        assert_eq!(
            absolute_checkout(Path::new("")).unwrap(),
            std::env::current_dir().unwrap()
        );
        assert!(absolute_checkout(Path::new("repo")).unwrap().is_absolute());
    }

    #[test]
    fn test_select_mounts_skips_missing_bind_sources() {
        let temp = tempdir().unwrap();
        let existing = temp.path().display().to_string();
        let config = DevcontainerConfig {
            mounts: vec![
                format!("type=bind,source={},target=/present", existing),
                "type=bind,source=/definitely/not/here,target=/missing".to_string(),
                "source=named-volume,target=/volume".to_string(),
                "type=volume,source=/definitely/not/here,target=/vol2".to_string(),
            ],
            ..Default::default()
        };

        let selected = select_mounts(&config, &Substitutor::new()).unwrap();
        assert_eq!(
            selected,
            vec![
                format!("type=bind,source={},target=/present", existing),
                "source=named-volume,target=/volume".to_string(),
                "type=volume,source=/definitely/not/here,target=/vol2".to_string(),
            ]
        );
    }

    #[test]
    fn test_select_mounts_passes_substituted_string_through() {
        let temp = tempdir().unwrap();
        let config = DevcontainerConfig {
            mounts: vec!["target=/cache,ro,source=${localEnv:CACHE_DIR},type=bind".to_string()],
            ..Default::default()
        };
        let substitutor =
            Substitutor::new().with_var("CACHE_DIR", temp.path().display().to_string());

        let selected = select_mounts(&config, &substitutor).unwrap();
        assert_eq!(
            selected,
            vec![format!(
                "target=/cache,ro,source={},type=bind",
                temp.path().display()
            )]
        );
    }
}
