use tasktuner::components::calendar_store::{CalendarStore, InMemoryStore, NewEvent};
use tasktuner::components::suggestion::EventDraft;
use tasktuner::config::{parse_base_url, Config, SupabaseConfig, SuggestionSettings};
use tasktuner::startup::build_state;

fn test_config() -> Config {
    Config {
        cohere_api_key: "test_cohere_key".to_string(),
        cohere_base_url: parse_base_url("https://api.cohere.ai/v1").unwrap(),
        suggestion: SuggestionSettings::default(),
        jwt_secret: "test_jwt_secret".to_string(),
        supabase: None,
        timezone: chrono_tz::UTC,
        host: "127.0.0.1".to_string(),
        port: 3000,
    }
}

/// Smoke test to verify that the state can be built without any backend
#[tokio::test]
async fn test_state_builds_with_in_memory_store() {
    let state = build_state(&test_config()).unwrap();
    assert!(state.store.list_events("anyone").await.unwrap().is_empty());
}

/// Smoke test to verify that a Supabase-backed state can be built without connecting
#[tokio::test]
async fn test_state_builds_with_supabase() {
    let mut config = test_config();
    config.supabase = Some(SupabaseConfig {
        url: parse_base_url("https://project.supabase.co").unwrap(),
        service_key: "service".to_string(),
    });
    assert!(build_state(&config).is_ok());
}

/// A suggestion draft goes straight into storage
#[tokio::test]
async fn test_draft_can_be_persisted() {
    let draft: EventDraft = serde_json::from_str(
        r#"{"title":"Team Sync","description":"","start":"2024-02-14T14:00:00.000Z","end":"2024-02-14T15:00:00.000Z","allDay":false}"#,
    )
    .unwrap();

    let store = InMemoryStore::new();
    let event = NewEvent::from(draft.clone()).validated().unwrap();
    let stored = store.create_event("user-1", &event).await.unwrap();

    assert_eq!(stored.user_id, "user-1");
    assert_eq!(stored.title, draft.title);
    assert_eq!(stored.start_time, draft.start);
    assert_eq!(stored.end_time, draft.end);
    assert!(!stored.all_day);
}
