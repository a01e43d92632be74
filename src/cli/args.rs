//! CLI argument parsing

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};

use crate::config::{AnalysisConfig, ConfigBuilder};

#[derive(Parser, Debug)]
#[command(name = "flacaudit", version)]
#[command(about = "Detect fake lossless audio by estimating the spectral cutoff")]
pub struct Args {
    /// Audio files or directories (searched recursively)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Worker threads (default: one per core)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Cutoff threshold in dB relative to the spectrum peak
    #[arg(long, allow_hyphen_values = true)]
    pub threshold_db: Option<f32>,

    /// Keep at most this many spectrograms in memory
    #[arg(long)]
    pub max_spectrograms: Option<usize>,

    /// Config file (JSON)
    #[arg(long, env = "FLACAUDIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Copy suspected fakes into DIR/_SUSPECTED_FAKE
    #[arg(long, value_name = "DIR")]
    pub organize: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Args {
    /// Effective configuration: file values overridden by flags
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        let base = AnalysisConfig::resolve(self.config.as_deref())?;
        let mut builder = ConfigBuilder::from_config(base);

        if let Some(threads) = self.threads {
            builder = builder.worker_threads(threads);
        }
        if let Some(threshold) = self.threshold_db {
            builder = builder.cutoff_threshold_db(threshold);
        }
        if self.max_spectrograms.is_some() {
            builder = builder.max_cached_spectrograms(self.max_spectrograms);
        }

        builder.build()
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}
