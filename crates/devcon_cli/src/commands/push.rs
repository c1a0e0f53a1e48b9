//! Push command - Push the dev container image.

use anyhow::Result;
use clap::Args;

use super::EngineArgs;

#[derive(Args, Debug)]
pub struct PushArgs {
    /// Image name (without tag; `latest` is always used)
    #[arg(short, long)]
    pub image_name: String,
}

pub async fn execute(args: PushArgs, engine: &EngineArgs) -> Result<()> {
    let cli = engine.connect()?;
    cli.push_image(&args.image_name).await?;

    println!("✅ Pushed {}", devcon_core::image_ref(&args.image_name));
    Ok(())
}
