use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdeaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No available Gemini models found (tried: {}). Please check your API key and model availability.", .tried.join(", "))]
    NoModelAvailable { tried: Vec<String> },

    #[error("Model {model} not available: {reason}")]
    ModelUnavailable { model: String, reason: String },

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Response contained no text")]
    EmptyResponse,

    #[error("Prompt was blocked: {0}")]
    Blocked(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl IdeaError {
    pub fn error_code(&self) -> &'static str {
        match self {
            IdeaError::Config(_) => "config_error",
            IdeaError::NoModelAvailable { .. } => "no_model_available",
            IdeaError::ModelUnavailable { .. } => "model_unavailable",
            IdeaError::Api { .. } => "api_error",
            IdeaError::EmptyResponse => "empty_response",
            IdeaError::Blocked(_) => "prompt_blocked",
            IdeaError::Http(_) => "http_error",
            IdeaError::Io(_) => "io_error",
            IdeaError::JsonParse(_) => "json_parse_error",
            IdeaError::TomlParse(_) => "toml_parse_error",
        }
    }

    /// Errors raised while building the client. The session cannot start after one of these.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            IdeaError::Config(_) | IdeaError::NoModelAvailable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, IdeaError>;
