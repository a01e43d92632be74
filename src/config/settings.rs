// src/config/settings.rs
//
// Analysis settings with defaults matching the forensic policy, a fluent
// builder, and JSON file loading.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the per-user configuration directory
pub const CONFIG_DIR_NAME: &str = "flacaudit";

/// Complete analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Start of the analysis window, in seconds into the file
    pub offset_secs: f32,
    /// Length of the analysis window in seconds
    pub duration_secs: f32,
    /// STFT frame size (power of two)
    pub n_fft: usize,
    /// STFT hop between frames
    pub hop_length: usize,
    /// Number of mel bands in the visualisation spectrogram
    pub n_mels: usize,
    /// Dynamic range kept below the peak when converting to dB
    pub top_db: f32,
    /// Level relative to the spectrum peak a bin must exceed to count
    /// towards the cutoff. Changing it moves every verdict boundary.
    pub cutoff_threshold_db: f32,
    /// Worker threads for the analysis pool; 0 lets rayon decide
    pub worker_threads: usize,
    /// Upper bound on spectrograms kept in the session cache (None = unbounded)
    pub max_cached_spectrograms: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            offset_secs: 30.0,
            duration_secs: 15.0,
            n_fft: 2048,
            hop_length: 512,
            n_mels: 128,
            top_db: 80.0,
            cutoff_threshold_db: -52.0,
            worker_threads: 0,
            max_cached_spectrograms: None,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Default per-user config location, e.g. `~/.config/flacaudit/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.json"))
    }

    /// Load from an explicit path, else the per-user file if present, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                log::debug!("Using config file {}", path.display());
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Reject settings the DSP stages cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.n_fft < 64 || !self.n_fft.is_power_of_two() {
            bail!("n_fft must be a power of two >= 64, got {}", self.n_fft);
        }
        if self.hop_length == 0 {
            bail!("hop_length must be positive");
        }
        if self.n_mels == 0 {
            bail!("n_mels must be positive");
        }
        if !(self.duration_secs > 0.0) {
            bail!("duration_secs must be positive, got {}", self.duration_secs);
        }
        if !(self.offset_secs >= 0.0) {
            bail!("offset_secs must not be negative, got {}", self.offset_secs);
        }
        if !(self.top_db > 0.0) {
            bail!("top_db must be positive, got {}", self.top_db);
        }
        if !self.cutoff_threshold_db.is_finite() || self.cutoff_threshold_db >= 0.0 {
            bail!(
                "cutoff_threshold_db must be a negative level, got {}",
                self.cutoff_threshold_db
            );
        }
        // the dB floor must sit below the threshold or every bin would count
        if -self.top_db >= self.cutoff_threshold_db {
            bail!(
                "top_db ({}) must reach below cutoff_threshold_db ({})",
                self.top_db,
                self.cutoff_threshold_db
            );
        }
        Ok(())
    }
}

/// Builder for custom configurations
pub struct ConfigBuilder {
    config: AnalysisConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    pub fn from_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn window(mut self, offset_secs: f32, duration_secs: f32) -> Self {
        self.config.offset_secs = offset_secs.max(0.0);
        self.config.duration_secs = duration_secs;
        self
    }

    pub fn n_fft(mut self, n_fft: usize) -> Self {
        self.config.n_fft = n_fft;
        self
    }

    pub fn hop_length(mut self, hop: usize) -> Self {
        self.config.hop_length = hop;
        self
    }

    pub fn n_mels(mut self, n_mels: usize) -> Self {
        self.config.n_mels = n_mels;
        self
    }

    pub fn cutoff_threshold_db(mut self, threshold_db: f32) -> Self {
        self.config.cutoff_threshold_db = threshold_db.clamp(-120.0, -1.0);
        self
    }

    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.config.worker_threads = threads;
        self
    }

    pub fn max_cached_spectrograms(mut self, limit: Option<usize>) -> Self {
        self.config.max_cached_spectrograms = limit;
        self
    }

    pub fn build(self) -> Result<AnalysisConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
