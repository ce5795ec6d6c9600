// TOML config adapter - Configuration loaded from a `[vidprep]` table
//
// Precedence: CLI > environment (VIDPREP_*) > file > defaults. The CLI layer
// is applied by the binary on top of what `load` returns.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::model::{DEFAULT_CODEC, DEFAULT_PRESET, MAX_VIDEO_BITRATE};
use crate::error::{VidprepError, VidprepResult};
use crate::sampler::DEFAULT_MAX_ATTEMPTS;
use crate::utils::logging::{LogFormat, LogLevel};

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "vidprep.toml";

/// Number of status frames sampled per video
pub const DEFAULT_STATUS_FRAMES: usize = 30;

/// Tool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub codec: String,
    pub preset: String,
    pub max_bitrate: u64,
    pub workers: usize,
    pub timeout_secs: u64,
    pub status_frames: usize,
    pub max_sample_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Compact,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            codec: DEFAULT_CODEC.to_string(),
            preset: DEFAULT_PRESET.to_string(),
            max_bitrate: MAX_VIDEO_BITRATE,
            workers: num_cpus::get(),
            timeout_secs: 3600,
            status_frames: DEFAULT_STATUS_FRAMES,
            max_sample_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Where a loaded configuration came from, for logging once a subscriber
/// is installed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigReport {
    pub file: Option<PathBuf>,
    pub env_overrides: usize,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    vidprep: Option<AppConfig>,
}

impl AppConfig {
    /// Defaults, then the config file, then `VIDPREP_*` variables.
    ///
    /// An explicit `path` must exist; the implicit `vidprep.toml` is optional.
    pub fn load(path: Option<&Path>) -> VidprepResult<(Self, ConfigReport)> {
        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };
        let mut config = match &file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let env_overrides = config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok((
            config,
            ConfigReport {
                file,
                env_overrides,
            },
        ))
    }

    /// Read a config file
    pub fn from_file(path: &Path) -> VidprepResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            VidprepError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse TOML text; a missing `[vidprep]` table means all defaults
    pub fn from_toml(content: &str) -> VidprepResult<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| VidprepError::Config(format!("Failed to parse TOML config: {}", e)))?;
        Ok(file.vidprep.unwrap_or_default())
    }

    /// Apply environment overrides through `lookup`; returns how many applied
    pub fn apply_env<F>(&mut self, lookup: F) -> VidprepResult<usize>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = 0;
        if let Some(v) = lookup("VIDPREP_LOG_LEVEL") {
            self.log_level = LogLevel::parse(&v)?;
            overrides += 1;
        }
        if let Some(v) = lookup("VIDPREP_LOG_FORMAT") {
            self.log_format = LogFormat::parse(&v)?;
            overrides += 1;
        }
        if let Some(v) = lookup("VIDPREP_FFMPEG") {
            self.ffmpeg_path = PathBuf::from(v);
            overrides += 1;
        }
        if let Some(v) = lookup("VIDPREP_FFPROBE") {
            self.ffprobe_path = PathBuf::from(v);
            overrides += 1;
        }
        if let Some(v) = lookup("VIDPREP_CODEC") {
            self.codec = v;
            overrides += 1;
        }
        if let Some(v) = lookup("VIDPREP_PRESET") {
            self.preset = v;
            overrides += 1;
        }
        if let Some(v) = lookup("VIDPREP_MAX_BITRATE") {
            self.max_bitrate = parse_number("VIDPREP_MAX_BITRATE", &v)?;
            overrides += 1;
        }
        if let Some(v) = lookup("VIDPREP_WORKERS") {
            self.workers = parse_number("VIDPREP_WORKERS", &v)?;
            overrides += 1;
        }
        if let Some(v) = lookup("VIDPREP_TIMEOUT_SECS") {
            self.timeout_secs = parse_number("VIDPREP_TIMEOUT_SECS", &v)?;
            overrides += 1;
        }
        Ok(overrides)
    }

    /// Validate configuration
    pub fn validate(&self) -> VidprepResult<()> {
        if self.workers == 0 {
            return Err(VidprepError::Config("workers must be at least 1".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(VidprepError::Config("timeout_secs must be positive".to_string()));
        }
        if self.codec.trim().is_empty() {
            return Err(VidprepError::Config("codec cannot be empty".to_string()));
        }
        if self.max_sample_attempts == 0 {
            return Err(VidprepError::Config(
                "max_sample_attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> VidprepResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| VidprepError::Config(format!("{} must be a number, got {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_table() {
        let config = AppConfig::from_toml(
            r#"
            [vidprep]
            codec = "h264_nvenc"
            max_bitrate = 5000000
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.codec, "h264_nvenc");
        assert_eq!(config.max_bitrate, 5_000_000);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.preset, DEFAULT_PRESET);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AppConfig::from_toml("[vidprep\ncodec="),
            Err(VidprepError::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = AppConfig::from_toml("[vidprep]\nworkers = 2\n").unwrap();
        let env: HashMap<&str, &str> =
            HashMap::from([("VIDPREP_WORKERS", "6"), ("VIDPREP_PRESET", "fast")]);
        let applied = config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(applied, 2);
        assert_eq!(config.workers, 6);
        assert_eq!(config.preset, "fast");
    }

    #[test]
    fn test_bad_env_number() {
        let mut config = AppConfig::default();
        let result = config.apply_env(|k| (k == "VIDPREP_MAX_BITRATE").then(|| "lots".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        let config = AppConfig {
            workers: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[vidprep]\ntimeout_secs = 60\n").unwrap();
        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_load_reports_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[vidprep]\nstatus_frames = 12\n").unwrap();
        let (config, report) = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.status_frames, 12);
        assert_eq!(report.file, Some(path));
    }
}
