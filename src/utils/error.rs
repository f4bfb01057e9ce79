use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("Expected {expected} responses, got {actual}")]
    ResponseCountError { expected: usize, actual: usize },

    #[error("Response for '{question}' is not an integer: '{value}'")]
    NonNumericResponseError { question: String, value: String },

    #[error("Response for '{question}' is out of range: {value} (allowed 0..={max})")]
    ResponseOutOfRangeError {
        question: String,
        value: i64,
        max: u32,
    },

    #[error("No response supplied for question '{question}'")]
    MissingResponseError { question: String },

    #[error("Unknown question id: '{question}'")]
    UnknownQuestionError { question: String },

    #[error("Failed to render {chart}: {message}")]
    RenderError { chart: String, message: String },

    #[error("Cannot format result: {what} is missing")]
    MissingInputError { what: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, ScreenError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad client input; always reported back with its reason.
    Validation,
    Render,
    Configuration,
    Storage,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScreenError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScreenError::ResponseCountError { .. }
            | ScreenError::NonNumericResponseError { .. }
            | ScreenError::ResponseOutOfRangeError { .. }
            | ScreenError::MissingResponseError { .. }
            | ScreenError::UnknownQuestionError { .. } => ErrorCategory::Validation,
            ScreenError::CsvError(e) if e.is_io_error() => ErrorCategory::Storage,
            ScreenError::CsvError(_) => ErrorCategory::Validation,
            ScreenError::RenderError { .. } => ErrorCategory::Render,
            ScreenError::ConfigValidationError { .. }
            | ScreenError::InvalidConfigValueError { .. }
            | ScreenError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ScreenError::IoError(_) | ScreenError::ZipError(_) => ErrorCategory::Storage,
            ScreenError::MissingInputError { .. } | ScreenError::SerializationError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Render | ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// Message safe to show to whoever submitted the responses. Render and
    /// internal failures never leak their details here.
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Configuration => {
                format!("Invalid input: {}", self)
            }
            ErrorCategory::Render => "Error generating graphs".to_string(),
            ErrorCategory::Storage => "Could not read or write the assessment files".to_string(),
            ErrorCategory::Internal => "Internal error while preparing the result".to_string(),
        }
    }

    /// Process exit status for the binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ScreenError::ResponseCountError { .. } | ScreenError::MissingResponseError { .. } => {
                "Answer every question in the questionnaire exactly once"
            }
            ScreenError::NonNumericResponseError { .. } => {
                "Responses must be whole numbers, separated by commas"
            }
            ScreenError::ResponseOutOfRangeError { .. } => {
                "Use values within the configured answer scale"
            }
            ScreenError::UnknownQuestionError { .. } => {
                "Check the question ids against the catalog (--list-questions)"
            }
            ScreenError::CsvError(e) if e.is_io_error() => {
                "Check that the responses file exists and is readable"
            }
            ScreenError::CsvError(_) => "The responses file must be CSV with an 'id,score' header",
            ScreenError::RenderError { .. } => "Check the [charts] layout settings and retry",
            ScreenError::ConfigValidationError { .. }
            | ScreenError::InvalidConfigValueError { .. }
            | ScreenError::MissingConfigError { .. } => "Fix the configuration file or flags",
            ScreenError::IoError(_) | ScreenError::ZipError(_) => {
                "Check that the output path exists and is writable"
            }
            ScreenError::MissingInputError { .. } | ScreenError::SerializationError(_) => {
                "Re-run with --verbose and report the log output"
            }
        }
    }
}
