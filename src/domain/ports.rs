use crate::core::renderer::ChartLayout;
use crate::domain::model::{
    Assessment, CategoryScores, ChartArtifacts, PresentationRecord, ResponseSet,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    /// Writes `data` under `path` and returns the location it ended up at.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Removes everything stored under the directory `path`. A directory that
    /// does not exist is not an error.
    fn remove_dir(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn max_per_question(&self) -> u32;
    fn chart_layout(&self) -> ChartLayout;
    fn archive_enabled(&self) -> bool;
}

pub trait ChartRenderer: Send + Sync {
    fn render(
        &self,
        responses: &ResponseSet,
        category_scores: &CategoryScores,
    ) -> Result<ChartArtifacts>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ResponseSet>;
    async fn transform(&self, responses: ResponseSet) -> Result<Assessment>;
    async fn load(&self, assessment: Assessment) -> Result<PresentationRecord>;
}
