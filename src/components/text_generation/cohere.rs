use super::{GenerationRequest, TextGenerator};
use crate::error::{transport_error, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

/// Request body for Cohere's generate endpoint
#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_likelihoods: Option<&'static str>,
}

/// Response from Cohere's generate endpoint
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    text: String,
}

/// Text generator backed by the Cohere `generate` API
pub struct CohereGenerator {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl CohereGenerator {
    /// Create a generator against `base_url` (e.g. `https://api.cohere.ai/v1/`)
    pub fn new(api_key: String, base_url: &Url) -> AppResult<Self> {
        let endpoint = base_url
            .join("generate")
            .map_err(|e| transport_error(&format!("Invalid Cohere base URL: {}", e)))?;
        Ok(Self {
            client: Client::new(),
            api_key,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for CohereGenerator {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
        let body = GenerateBody {
            model: &request.model,
            prompt: &request.prompt,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            return_likelihoods: request.suppress_likelihoods.then_some("NONE"),
        };

        debug!("Sending generate request to {} with model {}", self.endpoint, request.model);

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(&format!("Request to Cohere failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(&format!("Failed to read Cohere response: {}", e)))?;

        if !status.is_success() {
            error!("Cohere returned {}: {}", status, text);
            return Err(transport_error(&format!("Cohere request failed with status {}", status)));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Undecodable Cohere response: {}", text);
            transport_error(&format!("Failed to decode Cohere response: {}", e))
        })?;

        parsed
            .generations
            .into_iter()
            .next()
            .map(|generation| generation.text)
            .ok_or_else(|| transport_error("Cohere returned no generations"))
    }
}
