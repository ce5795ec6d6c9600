//! Command implementations

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::adapters::{AppConfig, ConfigReport};
use crate::app::{AppContainer, ClipsRequest, ConvertRequest};
use crate::cli::args::{ClipsArgs, ConvertArgs, GrabArgs, PlanArgs, SampleArgs};
use crate::cli::{Cli, Commands};
use crate::domain::model::TranscodeRequest;
use crate::planner::grab::GrabRequest;
use crate::planner::TranscodePlanner;
use crate::probe::parse_probe_json;
use crate::sampler::FrameSampler;
use crate::utils::logging::{LogFormat, LogLevel};

/// Load the config file and environment, then apply CLI flags on top
pub fn load_config(cli: &Cli) -> Result<(AppConfig, ConfigReport)> {
    let (mut config, report) =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    apply_cli_overrides(&mut config, cli)?;
    Ok((config, report))
}

/// Global flags and the command flags that shape the app container
pub fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) -> Result<()> {
    if let Some(level) = &cli.log_level {
        config.log_level = LogLevel::parse(level)?;
    }
    if let Some(format) = &cli.log_format {
        config.log_format = LogFormat::parse(format)?;
    }
    if let Commands::Convert(args) = &cli.command {
        if let Some(workers) = args.workers {
            config.workers = workers;
        }
    }
    config.validate()?;
    Ok(())
}

/// Execute the convert command
pub async fn convert(args: ConvertArgs, config: &AppConfig, container: &dyn AppContainer) -> Result<()> {
    let request = ConvertRequest {
        source_dir: args.source_dir,
        destination_dir: args.destination_dir,
        file: args.file,
        transcode: TranscodeRequest {
            target_codec: args.codec.unwrap_or_else(|| config.codec.clone()),
            target_fps: args.fps,
            target_preset: args.preset.unwrap_or_else(|| config.preset.clone()),
            scale_to_720: args.scale_720,
            target_bitrate: args.bitrate,
            max_bitrate_bps: args.max_bitrate.unwrap_or(config.max_bitrate),
            trim_start: args.start,
            trim_end: args.end,
        },
        status_dir: args.status_folder,
        extract_only: args.extract_only,
        seed: args.seed,
    };

    let response = container.convert_interactor().execute(&request).await?;
    for status in &response.status {
        if let Ok(set) = &status.result {
            info!("{}: {} status frames", status.video.display(), set.len());
        }
    }

    if response.failed() > 0 {
        bail!(
            "{} of {} files failed to convert",
            response.failed(),
            response.outcomes.len()
        );
    }
    info!("Converted {} files", response.succeeded());
    Ok(())
}

/// Execute the grab command
pub async fn grab(args: GrabArgs, container: &dyn AppContainer) -> Result<()> {
    let request = GrabRequest::new(
        args.start,
        args.end,
        args.num,
        args.fps,
        args.resolution,
        args.quality,
    )?
    .with_log(!args.no_log);

    let plan = container
        .grab_interactor()
        .execute(&args.video, args.output_dir, &request)
        .await?;
    if let Some(fps) = plan.fps {
        info!("Grabbed at {} fps", fps);
    }
    Ok(())
}

/// Execute the clips command
pub async fn clips(args: ClipsArgs, container: &dyn AppContainer) -> Result<()> {
    let request = ClipsRequest::new(&args.video, &args.intervals, &args.output_dir).fast(args.fast);
    let response = container.clip_interactor().execute(&request).await?;
    if response.failed() > 0 {
        bail!(
            "{} of {} clips failed",
            response.failed(),
            response.outcomes.len()
        );
    }
    info!("Cut {} clips", response.outcomes.len());
    Ok(())
}

/// Execute the plan command: print the decision for a stored probe result
pub fn plan(args: PlanArgs, config: &AppConfig) -> Result<()> {
    let json = std::fs::read_to_string(&args.probe_json)
        .with_context(|| format!("Failed to read {}", args.probe_json.display()))?;
    let media = parse_probe_json(&json)?;

    let request = TranscodeRequest {
        target_codec: args.codec.unwrap_or_else(|| config.codec.clone()),
        target_fps: args.fps,
        target_preset: args.preset.unwrap_or_else(|| config.preset.clone()),
        scale_to_720: args.scale_720,
        target_bitrate: args.bitrate,
        max_bitrate_bps: args.max_bitrate.unwrap_or(config.max_bitrate),
        trim_start: args.start,
        trim_end: args.end,
    };
    let decision = TranscodePlanner::new().decide(&media.descriptor, &request)?;

    if args.json {
        let output = serde_json::json!({
            "decision": decision,
            "args": decision.args(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match &decision.reason {
            Some(reason) => println!("re-encode: {}", reason),
            None => println!("stream copy"),
        }
        println!("{}", decision.args().join(" "));
    }
    Ok(())
}

/// Execute the sample command
pub fn sample(args: SampleArgs, config: &AppConfig) -> Result<()> {
    let sampler =
        FrameSampler::new().with_max_attempts(args.max_attempts.unwrap_or(config.max_sample_attempts));
    let amount = args.amount.unwrap_or(config.status_frames);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let set = sampler.sample(args.frames, amount, &mut rng);
    if set.len() < amount {
        warn!(
            "Only {} of {} indices drawn in {} attempts",
            set.len(),
            amount,
            set.attempts
        );
    }
    for index in set.iter() {
        println!("{}", index);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn overridden(argv: &[&str]) -> Result<AppConfig> {
        let cli = Cli::parse_from(argv);
        let mut config = AppConfig {
            workers: 8,
            ..AppConfig::default()
        };
        apply_cli_overrides(&mut config, &cli)?;
        Ok(config)
    }

    #[test]
    fn test_workers_flag_overrides_config() {
        let config = overridden(&["vidprep", "convert", "src", "dst", "--workers", "1"]).unwrap();
        assert_eq!(config.workers, 1);
    }

    #[test]
    fn test_workers_kept_without_flag() {
        let config = overridden(&["vidprep", "convert", "src", "dst"]).unwrap();
        assert_eq!(config.workers, 8);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(overridden(&["vidprep", "convert", "src", "dst", "--workers", "0"]).is_err());
    }

    #[test]
    fn test_global_log_flags() {
        let config = overridden(&["vidprep", "--log-level", "debug", "--log-format", "json", "sample", "--frames", "10"])
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
