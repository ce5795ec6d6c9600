//! vidprep - ffmpeg-driven video preparation
//!
//! # Usage
//!
//! ```bash
//! vidprep convert raw/ converted/ --codec h264_nvenc -b 3.3M -s status/
//! vidprep grab -v game.mp4 --start 00:01:00 --end 00:02:00 -n 50
//! vidprep clips -v game.mp4 -i intervals.txt -o clips/
//! vidprep plan --probe-json probe.json --scale-720
//! vidprep sample --frames 9000 --seed 7
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use vidprep_cli::app::DefaultAppContainer;
use vidprep_cli::cli::{commands, Cli, Commands};
use vidprep_cli::utils::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, report) = commands::load_config(&cli)?;
    init_logging(config.log_level, config.log_format);

    info!("Starting vidprep");
    if let Some(file) = &report.file {
        info!("Loaded configuration from {}", file.display());
    }
    if report.env_overrides > 0 {
        info!("Applied {} environment variable overrides", report.env_overrides);
    }
    let container = DefaultAppContainer::new(&config);

    match cli.command {
        Commands::Convert(args) => {
            info!("Executing convert command");
            commands::convert(args, &config, &container).await?;
        }
        Commands::Grab(args) => {
            info!("Executing grab command");
            commands::grab(args, &container).await?;
        }
        Commands::Clips(args) => {
            info!("Executing clips command");
            commands::clips(args, &container).await?;
        }
        Commands::Plan(args) => commands::plan(args, &config)?,
        Commands::Sample(args) => commands::sample(args, &config)?,
    }

    Ok(())
}
