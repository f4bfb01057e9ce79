pub mod aggregator;
pub mod engine;
pub mod formatter;
pub mod pipeline;
pub mod renderer;

pub use crate::domain::model::{
    Assessment, AssessmentResult, CategoryScores, ChartArtifacts, PresentationRecord, ResponseSet,
};
pub use crate::domain::ports::{ChartRenderer, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
