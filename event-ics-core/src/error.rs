use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed date '{input}': {reason}")]
    DateFormat { input: String, reason: String },

    #[error("Unknown month name: {0}")]
    UnknownMonth(String),

    #[error("Date does not exist: {0}")]
    InvalidDate(String),

    #[error("ICS timestamp parsing failed: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown time zone: {0}")]
    Timezone(String),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ICS generation failed: {0}")]
    IcsGeneration(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn date_format(input: &str, reason: impl Into<String>) -> Self {
        Self::DateFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// 是否属于调用方输入错误（而非内部错误）
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::DateFormat { .. }
                | Self::UnknownMonth(_)
                | Self::InvalidDate(_)
                | Self::Timestamp(_)
                | Self::MissingField(_)
                | Self::Timezone(_)
                | Self::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
