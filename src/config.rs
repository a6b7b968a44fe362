use crate::error::{config_error, env_error, AppResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use url::Url;

/// Default Cohere API base URL
pub const DEFAULT_COHERE_BASE_URL: &str = "https://api.cohere.ai/v1/";

/// Default location of the optional generation settings file
pub const DEFAULT_SUGGESTION_CONFIG: &str = "config/suggestion.toml";

/// Parameters sent with every text generation request
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SuggestionSettings {
    /// Model identifier
    pub model: String,
    /// Maximum output length in tokens
    pub max_tokens: u32,
    /// Sampling temperature, kept low for structured output
    pub temperature: f32,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            model: "command".to_string(),
            max_tokens: 500,
            temperature: 0.2,
        }
    }
}

impl SuggestionSettings {
    /// Load settings from a TOML file, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let settings: SuggestionSettings = toml::from_str(&content)?;
        if settings.model.trim().is_empty() {
            return Err(config_error("suggestion model must not be empty"));
        }
        if !(0.0..=5.0).contains(&settings.temperature) {
            return Err(config_error("suggestion temperature must be between 0 and 5"));
        }
        Ok(settings)
    }
}

/// Connection details for the hosted Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. https://xyz.supabase.co
    pub url: Url,
    /// Service role key used for row access
    pub service_key: String,
}

/// Main configuration structure for the server
#[derive(Debug, Clone)]
pub struct Config {
    /// Cohere API key
    pub cohere_api_key: String,
    /// Cohere API base URL
    pub cohere_base_url: Url,
    /// Generation parameters
    pub suggestion: SuggestionSettings,
    /// Secret used to verify Supabase access tokens
    pub jwt_secret: String,
    /// Row storage, in-memory when not configured
    pub supabase: Option<SupabaseConfig>,
    /// Timezone used for "today" and offset-less dates
    pub timezone: Tz,
    /// Address to bind the HTTP server to
    pub host: String,
    /// Port to bind the HTTP server to
    pub port: u16,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let cohere_api_key = env::var("COHERE_API_KEY").map_err(|_| env_error("COHERE_API_KEY"))?;
        let jwt_secret =
            env::var("SUPABASE_JWT_SECRET").map_err(|_| env_error("SUPABASE_JWT_SECRET"))?;

        let cohere_base_url = env::var("COHERE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_COHERE_BASE_URL.to_string());
        let cohere_base_url = parse_base_url(&cohere_base_url)?;

        let supabase = supabase_config(
            env::var("SUPABASE_URL").ok(),
            env::var("SUPABASE_SERVICE_ROLE_KEY").ok(),
        )?;

        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from("UTC"));
        let timezone = parse_timezone(&timezone)?;

        let host = env::var("HOST").unwrap_or_else(|_| String::from("127.0.0.1"));
        let port = match env::var("PORT") {
            Ok(port) => port
                .parse::<u16>()
                .map_err(|_| config_error("Invalid PORT format"))?,
            Err(_) => 3000,
        };

        let settings_path = env::var("SUGGESTION_CONFIG")
            .unwrap_or_else(|_| DEFAULT_SUGGESTION_CONFIG.to_string());
        let suggestion = SuggestionSettings::load(Path::new(&settings_path))?;

        Ok(Config {
            cohere_api_key,
            cohere_base_url,
            suggestion,
            jwt_secret,
            supabase,
            timezone,
            host,
            port,
        })
    }
}

/// Pair the Supabase URL with its service key. Both or neither must be set
pub fn supabase_config(
    url: Option<String>,
    service_key: Option<String>,
) -> AppResult<Option<SupabaseConfig>> {
    match (url, service_key) {
        (Some(url), Some(service_key)) => Ok(Some(SupabaseConfig {
            url: parse_base_url(&url)?,
            service_key,
        })),
        (Some(_), None) => Err(env_error("SUPABASE_SERVICE_ROLE_KEY")),
        (None, Some(_)) => Err(env_error("SUPABASE_URL")),
        (None, None) => Ok(None),
    }
}

/// Parse a timezone name such as `Europe/Helsinki`
pub fn parse_timezone(name: &str) -> AppResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| config_error(&format!("Unknown timezone: {}", name)))
}

/// Parse a base URL, making sure it ends with a slash so `join` appends to it
pub fn parse_base_url(raw: &str) -> AppResult<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    let url = Url::parse(&normalized)
        .map_err(|e| config_error(&format!("Invalid URL {}: {}", raw, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(config_error(&format!("Unsupported URL scheme in {}", raw)));
    }
    Ok(url)
}
