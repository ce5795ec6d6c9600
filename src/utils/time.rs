//! Time parsing utilities

use crate::error::{VidprepError, VidprepResult};

/// Time parser for the timestamp forms accepted on the command line and in
/// interval files
pub struct TimeParser;

impl TimeParser {
    /// Create a new time parser
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TimeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeParser {
    /// Parse time string to seconds.
    ///
    /// Anything after the first comma is dropped, so `00:00:10,500` reads as
    /// ten seconds.
    pub fn parse_time(&self, time_str: &str) -> VidprepResult<f64> {
        let head = time_str.split(',').next().unwrap_or_default().trim();
        if head.is_empty() {
            return Err(Self::invalid(time_str));
        }

        // Plain seconds
        if let Ok(seconds) = head.parse::<f64>() {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(Self::invalid(time_str));
            }
            return Ok(seconds);
        }

        let parts: Vec<&str> = head.split(':').collect();
        match parts.as_slice() {
            [minutes, seconds] => {
                let minutes = self.parse_component(minutes, time_str)?;
                let seconds = self.parse_seconds(seconds, time_str)?;
                Ok(minutes * 60.0 + seconds)
            }
            [hours, minutes, seconds] => {
                let hours = self.parse_component(hours, time_str)?;
                let minutes = self.parse_component(minutes, time_str)?;
                if minutes >= 60.0 {
                    return Err(Self::invalid(time_str));
                }
                let seconds = self.parse_seconds(seconds, time_str)?;
                Ok(hours * 3600.0 + minutes * 60.0 + seconds)
            }
            _ => Err(Self::invalid(time_str)),
        }
    }

    /// Parse an hour or minute field
    fn parse_component(&self, part: &str, original: &str) -> VidprepResult<f64> {
        part.parse::<u32>()
            .map(f64::from)
            .map_err(|_| Self::invalid(original))
    }

    /// Parse the seconds field, which may carry a fraction
    fn parse_seconds(&self, part: &str, original: &str) -> VidprepResult<f64> {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(Self::invalid(original));
        }
        let seconds: f64 = part.parse().map_err(|_| Self::invalid(original))?;
        if seconds >= 60.0 {
            return Err(Self::invalid(original));
        }
        Ok(seconds)
    }

    fn invalid(time_str: &str) -> VidprepError {
        VidprepError::InvalidTimeFormat {
            time: time_str.to_string(),
        }
    }
}
