use crate::core::{Pipeline, PresentationRecord};
use crate::utils::error::Result;
use std::time::Instant;

pub struct AssessmentEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AssessmentEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<PresentationRecord> {
        let started = Instant::now();
        tracing::info!("Starting assessment");

        let responses = self.pipeline.extract().await.inspect_err(|e| {
            tracing::warn!("Rejected submission: {}", e);
        })?;
        tracing::info!("Decoded {} responses", responses.len());

        let assessment = self.pipeline.transform(responses).await?;
        tracing::info!(
            request_id = %assessment.request_id,
            total_score = assessment.result.total_score,
            tier = ?assessment.result.likelihood_tier,
            "Scored submission"
        );

        let record = self.pipeline.load(assessment).await?;
        tracing::info!(
            "Stored {} artifacts in {:?}",
            record.artifacts.len(),
            started.elapsed()
        );

        Ok(record)
    }
}
