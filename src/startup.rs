use crate::components::calendar_store::{CalendarStore, InMemoryStore, SupabaseStore};
use crate::components::text_generation::CohereGenerator;
use crate::components::SuggestionService;
use crate::config::Config;
use crate::error::{AppResult, Error};
use crate::shutdown;
use crate::web::{self, auth::AuthService, AppState};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire the collaborators described by `config` into the shared router state
pub fn build_state(config: &Config) -> AppResult<AppState> {
    let generator = CohereGenerator::new(config.cohere_api_key.clone(), &config.cohere_base_url)?;
    info!(
        "Using text generation model {} at {}",
        config.suggestion.model,
        generator.endpoint()
    );

    let suggestions = SuggestionService::new(
        Arc::new(generator),
        config.suggestion.clone(),
        config.timezone,
    );

    let store: Arc<dyn CalendarStore> = match &config.supabase {
        Some(supabase) => Arc::new(SupabaseStore::new(supabase)?),
        None => {
            warn!("SUPABASE_URL not set, events are kept in memory and lost on restart");
            Arc::new(InMemoryStore::new())
        }
    };

    Ok(AppState {
        suggestions,
        store,
        auth_service: Arc::new(AuthService::new(&config.jwt_secret)),
        timezone: config.timezone,
    })
}

/// Bind the HTTP server and serve until a shutdown signal arrives
pub async fn start_server(config: Config) -> miette::Result<()> {
    let state = build_state(&config)?;
    let app = web::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(Error::Io)?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::Io)?;

    info!("Server stopped");
    Ok(())
}
