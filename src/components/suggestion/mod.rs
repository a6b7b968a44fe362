use crate::components::text_generation::{GenerationRequest, TextGenerator};
use crate::config::SuggestionSettings;
use crate::error::{AppResult, Error};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub mod interpreter;
pub mod models;
pub mod prompt;

pub use interpreter::{extract_json_object, interpret, interpret_response};
pub use models::{EventDraft, Interpretation, Repairs};
pub use prompt::{build_prompt, DateReferenceTable};

/// Natural-language event suggestion pipeline: build prompt, generate, interpret
#[derive(Clone)]
pub struct SuggestionService {
    generator: Arc<dyn TextGenerator>,
    settings: SuggestionSettings,
    timezone: Tz,
}

impl SuggestionService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        settings: SuggestionSettings,
        timezone: Tz,
    ) -> Self {
        Self {
            generator,
            settings,
            timezone,
        }
    }

    /// Suggest an event for `user_prompt`, evaluated at the current time
    pub async fn suggest_event(&self, user_prompt: &str) -> AppResult<EventDraft> {
        self.suggest_event_at(user_prompt, Utc::now()).await
    }

    /// Suggest an event for `user_prompt` as if it were `now`
    pub async fn suggest_event_at(
        &self,
        user_prompt: &str,
        now: DateTime<Utc>,
    ) -> AppResult<EventDraft> {
        let request = self.compose(user_prompt, now);
        let raw = self.generate(&request).await?;
        self.interpret(&raw, now)
    }

    /// Stage 1: the model request for `user_prompt`
    pub fn compose(&self, user_prompt: &str, now: DateTime<Utc>) -> GenerationRequest {
        GenerationRequest::new(build_prompt(user_prompt, now, self.timezone), &self.settings)
    }

    /// Stage 2: call the text generation service once
    pub async fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
        debug!("Requesting suggestion from model {}", request.model);
        match self.generator.generate(request).await {
            Ok(text) => Ok(text),
            Err(Error::Transport(message)) => {
                error!("Text generation failed: {}", message);
                Err(Error::Transport(message))
            }
            Err(e) => {
                error!("Text generation failed: {}", e);
                Err(Error::Transport(e.to_string()))
            }
        }
    }

    /// Stage 3: turn the raw reply into a draft
    pub fn interpret(&self, raw: &str, now: DateTime<Utc>) -> AppResult<EventDraft> {
        let interpretation = interpret(raw, now, self.timezone).map_err(|e| {
            error!("Failed to parse model response ({}): {}", e, raw);
            Error::Parse(e)
        })?;

        let repairs = interpretation.repairs;
        if repairs.start_defaulted {
            warn!("Model reply had no usable start time, defaulting to now: {}", raw);
        }
        if repairs.any() {
            debug!("Repaired suggestion fields: {:?}", repairs);
        }
        info!("Suggested event \"{}\"", interpretation.draft.title);

        Ok(interpretation.draft)
    }
}
