use miette::Diagnostic;
use thiserror::Error;

/// Reasons a model reply could not be turned into an event draft
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    #[error("no JSON object in model output")]
    #[diagnostic(code(tasktuner::parse::no_json))]
    NoJsonObject,

    #[error("malformed JSON: {0}")]
    #[diagnostic(code(tasktuner::parse::malformed_json))]
    MalformedJson(String),
}

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Failed to parse model output: {0}")]
    #[diagnostic(code(tasktuner::parse))]
    Parse(#[from] ParseError),

    #[error("Text generation request failed: {0}")]
    #[diagnostic(code(tasktuner::transport))]
    Transport(String),

    #[error("Calendar storage error: {0}")]
    #[diagnostic(code(tasktuner::storage))]
    Storage(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(tasktuner::not_found))]
    NotFound(String),

    #[error("Invalid input: {0}")]
    #[diagnostic(code(tasktuner::invalid_input))]
    InvalidInput(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(tasktuner::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(tasktuner::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(tasktuner::io))]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    #[diagnostic(code(tasktuner::other))]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create transport errors for the text generation service
pub fn transport_error(message: &str) -> Error {
    Error::Transport(message.to_string())
}

/// Helper to create calendar storage errors
pub fn storage_error(message: &str) -> Error {
    Error::Storage(message.to_string())
}

/// Helper to create validation errors
pub fn invalid_input(message: &str) -> Error {
    Error::InvalidInput(message.to_string())
}
