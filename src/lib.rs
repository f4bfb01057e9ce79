pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    aggregator::aggregate,
    engine::AssessmentEngine,
    formatter::format,
    pipeline::{assess, ResponseSource, ScreeningPipeline},
    renderer::{ChartLayout, SvgRenderer},
};
pub use domain::model::{
    AssessmentResult, Category, CategoryScores, ChartArtifacts, LikelihoodTier,
    PresentationRecord, ResponseSet,
};
pub use utils::error::{Result, ScreenError};
