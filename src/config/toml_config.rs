use crate::core::pipeline::ResponseSource;
use crate::core::renderer::ChartLayout;
use crate::core::ConfigProvider;
use crate::domain::model::MAX_SCALE;
use crate::utils::error::{Result, ScreenError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub scoring: ScoringConfig,
    pub charts: ChartLayout,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Answers run 0..=max_per_question. The tier thresholds (41 and 61) are
    /// calibrated against the default of 5, i.e. a maximum total of 100.
    pub max_per_question: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_per_question: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: String,
    pub archive: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            archive: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub responses: Option<String>,
    pub responses_file: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScreenError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScreenError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScreenError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("output.output_path", &self.output.output_path)?;
        validation::validate_range(
            "scoring.max_per_question",
            self.scoring.max_per_question,
            1,
            MAX_SCALE,
        )?;

        let charts = &self.charts;
        validation::validate_range("charts.bar_width", charts.bar_width, 300.0, 8000.0)?;
        validation::validate_range("charts.row_height", charts.row_height, 8.0, 200.0)?;
        validation::validate_range(
            "charts.label_width",
            charts.label_width,
            40.0,
            charts.bar_width - 100.0,
        )?;
        validation::validate_range("charts.max_label_chars", charts.max_label_chars, 4, 500)?;
        validation::validate_range("charts.radar_size", charts.radar_size, 300.0, 4000.0)?;
        validation::validate_range("charts.radar_rings", charts.radar_rings, 1, 20)?;

        if let Some(file) = &self.input.responses_file {
            validation::validate_file_extension("input.responses_file", file, &["csv", "txt"])?;
        }

        Ok(())
    }

    /// Inline responses win over a file when both are configured.
    pub fn response_source(&self) -> Result<ResponseSource> {
        if let Some(inline) = &self.input.responses {
            return Ok(ResponseSource::Delimited(inline.clone()));
        }
        match &self.input.responses_file {
            Some(file) => Ok(ResponseSource::File(file.into())),
            None => Err(ScreenError::MissingConfigError {
                field: "input.responses or input.responses_file".to_string(),
            }),
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn max_per_question(&self) -> u32 {
        self.scoring.max_per_question
    }

    fn chart_layout(&self) -> ChartLayout {
        self.charts.clone()
    }

    fn archive_enabled(&self) -> bool {
        self.output.archive
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
