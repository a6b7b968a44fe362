use crate::config::SuggestionSettings;
use crate::error::AppResult;
use async_trait::async_trait;

pub mod cohere;

pub use cohere::CohereGenerator;

/// A single completion request for the text generation service
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model identifier
    pub model: String,
    /// Full prompt text
    pub prompt: String,
    /// Maximum output length in tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Ask the service to omit token likelihoods
    pub suppress_likelihoods: bool,
}

impl GenerationRequest {
    /// Build a request for `prompt` using the configured generation parameters
    pub fn new(prompt: String, settings: &SuggestionSettings) -> Self {
        Self {
            model: settings.model.clone(),
            prompt,
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            suppress_likelihoods: true,
        }
    }
}

/// External language model turning a prompt into free text
#[async_trait]
pub trait TextGenerator: Send + Sync + 'static {
    /// Return the text of the first completion
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String>;
}
