use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{MorseError, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub encoder: EncoderConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.encoder.validate()?;
        self.output.validate()
    }
}

/// Encoder parameters that may change between emissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Speed in words per minute.
    pub wpm: f64,
    /// Tone frequency in Hz.
    pub tone: f64,
    /// Amplitude scale, not clamped.
    pub volume: f64,
    pub short_numbers: bool,
    /// Indices of the channels carrying the tone.
    pub channels: BTreeSet<usize>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            wpm: 20.0,
            tone: 700.0,
            volume: 1.0,
            short_numbers: false,
            channels: BTreeSet::from([0]),
        }
    }
}

impl EncoderConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.wpm.is_finite() && self.wpm > 0.0) {
            return Err(MorseError::invalid_config(format!(
                "wpm must be positive, got {}",
                self.wpm
            )));
        }
        if !(self.tone.is_finite() && self.tone > 0.0) {
            return Err(MorseError::invalid_config(format!(
                "tone must be positive, got {}",
                self.tone
            )));
        }
        if !self.volume.is_finite() {
            return Err(MorseError::invalid_config("volume must be finite"));
        }
        Ok(())
    }
}

/// Format of the audio target written by the command line app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub sample_rate: u32,
    pub channels: u16,
    /// 16 for integer PCM, 32 for float.
    pub bits_per_sample: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 1,
            bits_per_sample: 16,
        }
    }
}

impl OutputConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(MorseError::invalid_config("sample_rate must be positive"));
        }
        if self.channels == 0 {
            return Err(MorseError::invalid_config("channels must be at least 1"));
        }
        if !matches!(self.bits_per_sample, 16 | 32) {
            return Err(MorseError::invalid_config(format!(
                "bits_per_sample must be 16 or 32, got {}",
                self.bits_per_sample
            )));
        }
        Ok(())
    }
}
