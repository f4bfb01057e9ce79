use crate::core::aggregator::aggregate;
use crate::core::formatter;
use crate::core::renderer::SvgRenderer;
use crate::core::{
    Assessment, ChartRenderer, ConfigProvider, Pipeline, PresentationRecord, ResponseSet, Storage,
};
use crate::domain::model::StoredArtifacts;
use crate::utils::error::{Result, ScreenError};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use zip::write::{FileOptions, ZipWriter};

pub const ARCHIVE_NAME: &str = "assessment.zip";
pub const RECORD_NAME: &str = "result.json";

/// Where one submission's answers come from.
#[derive(Debug, Clone)]
pub enum ResponseSource {
    /// Positional, comma separated: `"0,3,5,..."`.
    Delimited(String),
    /// Question id -> raw answer, as posted by a form.
    Answers(HashMap<String, String>),
    /// `.csv` files hold `id,score` rows; anything else is read as the
    /// delimited form.
    File(PathBuf),
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    id: String,
    score: String,
}

fn read_answers_csv(path: &Path) -> Result<HashMap<String, String>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let mut answers = HashMap::new();
    let mut rows = 0usize;
    for row in reader.deserialize::<AnswerRow>() {
        let row = row?;
        rows += 1;
        answers.insert(row.id, row.score);
    }

    // duplicate ids would otherwise collapse silently
    let expected = crate::domain::catalog::question_count();
    if rows != answers.len() || rows != expected {
        return Err(ScreenError::ResponseCountError {
            expected,
            actual: rows,
        });
    }
    Ok(answers)
}

/// Scores and renders one submission. Either both the result and the charts
/// come back or nothing does.
pub fn assess<R: ChartRenderer>(
    responses: ResponseSet,
    renderer: &R,
    max_per_question: u32,
) -> Result<Assessment> {
    let result = aggregate(&responses);
    let charts = renderer
        .render(&responses, &result.category_scores)
        .inspect_err(|e| tracing::error!("Chart rendering failed: {}", e))?;

    Ok(Assessment {
        request_id: Uuid::new_v4(),
        max_per_question,
        responses,
        result,
        charts,
    })
}

pub struct ScreeningPipeline<S: Storage, C: ConfigProvider, R: ChartRenderer = SvgRenderer> {
    storage: S,
    config: C,
    renderer: R,
    source: ResponseSource,
}

impl<S: Storage, C: ConfigProvider> ScreeningPipeline<S, C, SvgRenderer> {
    pub fn new(storage: S, config: C, source: ResponseSource) -> Self {
        let renderer = SvgRenderer::new(config.chart_layout(), config.max_per_question());
        Self {
            storage,
            config,
            renderer,
            source,
        }
    }
}

impl<S: Storage, C: ConfigProvider, R: ChartRenderer> ScreeningPipeline<S, C, R> {
    pub fn with_renderer(storage: S, config: C, renderer: R, source: ResponseSource) -> Self {
        Self {
            storage,
            config,
            renderer,
            source,
        }
    }

    fn build_archive(&self, assessment: &Assessment, record: &PresentationRecord) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        zip.start_file::<_, ()>(RECORD_NAME, FileOptions::default())?;
        let json_data = serde_json::to_string_pretty(record)?;
        zip.write_all(json_data.as_bytes())?;

        for (name, bytes) in assessment.charts.named() {
            zip.start_file::<_, ()>(name, FileOptions::default())?;
            zip.write_all(bytes)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    async fn store(&self, assessment: &Assessment, request_dir: &str) -> Result<PresentationRecord> {
        let mut stored = StoredArtifacts::default();

        for (name, bytes) in assessment.charts.named() {
            let location = self
                .storage
                .write_file(&format!("{}/{}", request_dir, name), bytes)
                .await?;
            tracing::debug!("Stored {} ({} bytes) at {}", name, bytes.len(), location);
            stored.locations.insert(name.to_string(), location);
        }

        let mut record = formatter::format(Some(assessment), Some(&stored))?;

        if self.config.archive_enabled() {
            let archive = self.build_archive(assessment, &record)?;
            tracing::debug!("Writing archive ({} bytes)", archive.len());
            let location = self
                .storage
                .write_file(&format!("{}/{}", request_dir, ARCHIVE_NAME), &archive)
                .await?;
            record.artifacts.insert(ARCHIVE_NAME.to_string(), location);
        }

        Ok(record)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, R: ChartRenderer> Pipeline for ScreeningPipeline<S, C, R> {
    async fn extract(&self) -> Result<ResponseSet> {
        let max = self.config.max_per_question();
        match &self.source {
            ResponseSource::Delimited(input) => ResponseSet::parse_delimited(input, max),
            ResponseSource::Answers(answers) => ResponseSet::from_answers(answers, max),
            ResponseSource::File(path) => {
                tracing::debug!("Reading responses from {}", path.display());
                let is_csv = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
                if is_csv {
                    ResponseSet::from_answers(&read_answers_csv(path)?, max)
                } else {
                    let content = tokio::fs::read_to_string(path).await?;
                    ResponseSet::parse_delimited(&content, max)
                }
            }
        }
    }

    async fn transform(&self, responses: ResponseSet) -> Result<Assessment> {
        assess(responses, &self.renderer, self.config.max_per_question())
    }

    async fn load(&self, assessment: Assessment) -> Result<PresentationRecord> {
        let request_dir = assessment.request_id.to_string();

        match self.store(&assessment, &request_dir).await {
            Ok(record) => Ok(record),
            Err(e) => {
                // a partial set of artifacts is never left behind
                if let Err(cleanup) = self.storage.remove_dir(&request_dir).await {
                    tracing::warn!("Failed to clean up {}: {}", request_dir, cleanup);
                }
                Err(e)
            }
        }
    }
}
