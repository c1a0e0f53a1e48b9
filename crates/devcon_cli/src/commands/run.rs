//! Run command - Run a command inside the dev container.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use devcon_core::RunOptions;

use super::EngineArgs;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Image name (without tag; `latest` is always used)
    #[arg(short, long)]
    pub image_name: String,

    /// Path of the checked-out repository
    #[arg(short, long, default_value = ".")]
    pub checkout_path: PathBuf,

    /// Folder inside the checkout holding `.devcontainer`
    #[arg(short, long, default_value = "")]
    pub sub_folder: String,

    /// Environment variable for the container (KEY=VALUE, repeatable)
    #[arg(short, long = "env")]
    pub envs: Vec<String>,

    /// Extra mount (accepted for compatibility, not applied)
    #[arg(long = "mount")]
    pub mounts: Vec<String>,

    /// Command to run inside the container
    #[arg(trailing_var_arg = true, required = true)]
    pub command: Vec<String>,
}

impl RunArgs {
    fn options(&self) -> RunOptions {
        let mut options = RunOptions::new(self.command.join(" ")).envs(self.envs.clone());
        for mount in &self.mounts {
            options = options.mount(mount.clone());
        }
        options
    }
}

pub async fn execute(args: RunArgs, engine: &EngineArgs) -> Result<()> {
    let cli = engine.connect()?;
    let options = args.options();

    cli.run_container(
        &args.image_name,
        &args.checkout_path,
        &args.sub_folder,
        &options,
    )
    .await?;

    Ok(())
}
