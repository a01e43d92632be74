//! Configuration module for flacaudit

mod settings;

pub use settings::{AnalysisConfig, ConfigBuilder, CONFIG_DIR_NAME};
