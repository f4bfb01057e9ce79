pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::pipeline::ResponseSource;
#[cfg(feature = "cli")]
use crate::core::renderer::ChartLayout;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::MAX_SCALE;
#[cfg(feature = "cli")]
use crate::utils::error::{Result, ScreenError};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "screen-score")]
#[command(about = "Score a behavioral screening questionnaire and render its charts")]
pub struct CliConfig {
    /// Comma separated answers in catalog order, e.g. "0,3,5,..."
    #[arg(long, conflicts_with = "responses_file")]
    pub responses: Option<String>,

    /// CSV file with an `id,score` header, or a text file with the comma separated form
    #[arg(long)]
    pub responses_file: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Highest allowed answer per question
    #[arg(long, default_value = "5")]
    pub max_per_question: u32,

    /// Also write a zip with the record and both charts
    #[arg(long)]
    pub archive: bool,

    /// Print the full record as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Print the question catalog and exit
    #[arg(long)]
    pub list_questions: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(skip)]
    pub layout: ChartLayout,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn response_source(&self) -> Result<ResponseSource> {
        match (&self.responses, &self.responses_file) {
            (Some(inline), None) => Ok(ResponseSource::Delimited(inline.clone())),
            (None, Some(file)) => Ok(ResponseSource::File(file.into())),
            (Some(_), Some(_)) => Err(ScreenError::ConfigValidationError {
                field: "responses".to_string(),
                message: "use either --responses or --responses-file, not both".to_string(),
            }),
            (None, None) => Err(ScreenError::MissingConfigError {
                field: "--responses or --responses-file".to_string(),
            }),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_range("max_per_question", self.max_per_question, 1, MAX_SCALE)?;
        if let Some(file) = &self.responses_file {
            validation::validate_file_extension("responses_file", file, &["csv", "txt"])?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn max_per_question(&self) -> u32 {
        self.max_per_question
    }

    fn chart_layout(&self) -> ChartLayout {
        self.layout.clone()
    }

    fn archive_enabled(&self) -> bool {
        self.archive
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inline_responses() {
        let config = CliConfig::parse_from(["screen-score", "--responses", "1,2,3"]);
        assert_eq!(config.max_per_question, 5);
        assert_eq!(config.output_path, "./output");
        assert!(matches!(
            config.response_source().unwrap(),
            ResponseSource::Delimited(s) if s == "1,2,3"
        ));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_source_is_config_error() {
        let config = CliConfig::parse_from(["screen-score"]);
        assert!(matches!(
            config.response_source(),
            Err(ScreenError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_scale_and_bad_extension() {
        let config = CliConfig::parse_from(["screen-score", "--max-per-question", "0"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["screen-score", "--max-per-question", "4000000000"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["screen-score", "--responses-file", "answers.xlsx"]);
        assert!(config.validate().is_err());
    }
}
