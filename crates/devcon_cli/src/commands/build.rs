//! Build command - Build the dev container image.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::EngineArgs;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Image name (without tag; `latest` is always used)
    #[arg(short, long)]
    pub image_name: String,

    /// Path of the checked-out repository
    #[arg(short, long, default_value = ".")]
    pub checkout_path: PathBuf,

    /// Folder inside the checkout holding `.devcontainer`
    #[arg(short, long, default_value = "")]
    pub sub_folder: String,
}

pub async fn execute(args: BuildArgs, engine: &EngineArgs) -> Result<()> {
    let cli = engine.connect()?;

    cli.ensure_buildx().await?;

    cli.build_image(&args.image_name, &args.checkout_path, &args.sub_folder)
        .await?;

    println!("✅ Built {}", devcon_core::image_ref(&args.image_name));
    Ok(())
}
