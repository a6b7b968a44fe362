use super::models::{CalendarEvent, EventRow, NewEvent};
use super::CalendarStore;
use crate::config::SupabaseConfig;
use crate::error::{storage_error, AppResult, Error};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{error, info};
use url::Url;

/// PostgREST table holding the events
const EVENTS_TABLE: &str = "rest/v1/calendar_events";

/// Event storage backed by a Supabase project's REST API
pub struct SupabaseStore {
    client: Client,
    endpoint: Url,
    service_key: String,
}

impl SupabaseStore {
    /// Create a store for the configured project
    pub fn new(config: &SupabaseConfig) -> AppResult<Self> {
        let endpoint = config
            .url
            .join(EVENTS_TABLE)
            .map_err(|e| storage_error(&format!("Invalid Supabase URL: {}", e)))?;
        info!("Using Supabase event storage at {}", endpoint);
        Ok(Self {
            client: Client::new(),
            endpoint,
            service_key: config.service_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Attach the API key headers every PostgREST call needs
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Filter selecting one event of one owner
    fn event_filter(owner: &str, id: &str) -> [(&'static str, String); 2] {
        [("id", format!("eq.{}", id)), ("user_id", format!("eq.{}", owner))]
    }

    /// Send a request and decode the returned rows
    async fn rows(&self, builder: RequestBuilder, action: &str) -> AppResult<Vec<CalendarEvent>> {
        let response = self
            .authorized(builder)
            .send()
            .await
            .map_err(|e| storage_error(&format!("Supabase {} request failed: {}", action, e)))?;
        let response = check_status(response, action).await?;
        response
            .json::<Vec<CalendarEvent>>()
            .await
            .map_err(|e| {
                storage_error(&format!("Failed to decode Supabase {} response: {}", action, e))
            })
    }
}

async fn check_status(response: Response, action: &str) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    error!("Supabase {} returned {}: {}", action, status, body);
    Err(storage_error(&format!("Supabase {} failed with status {}", action, status)))
}

/// First returned row, or `NotFound` when the filter matched nothing
fn single_row(rows: Vec<CalendarEvent>, id: &str) -> AppResult<CalendarEvent> {
    rows.into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(format!("event {}", id)))
}

#[async_trait]
impl CalendarStore for SupabaseStore {
    async fn list_events(&self, owner: &str) -> AppResult<Vec<CalendarEvent>> {
        let request = self.client.get(self.endpoint.clone()).query(&[
            ("select", "*".to_string()),
            ("user_id", format!("eq.{}", owner)),
            ("order", "start_time.asc".to_string()),
        ]);
        self.rows(request, "list").await
    }

    async fn create_event(&self, owner: &str, event: &NewEvent) -> AppResult<CalendarEvent> {
        let request = self
            .client
            .post(self.endpoint.clone())
            .header("Prefer", "return=representation")
            .json(&[EventRow::new(owner, event)]);
        let rows = self.rows(request, "insert").await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| storage_error("Failed to save event - no data returned"))
    }

    async fn update_event(
        &self,
        owner: &str,
        id: &str,
        event: &NewEvent,
    ) -> AppResult<CalendarEvent> {
        let request = self
            .client
            .patch(self.endpoint.clone())
            .query(&Self::event_filter(owner, id))
            .header("Prefer", "return=representation")
            .json(&EventRow::new(owner, event));
        single_row(self.rows(request, "update").await?, id)
    }

    async fn delete_event(&self, owner: &str, id: &str) -> AppResult<()> {
        let request = self
            .client
            .delete(self.endpoint.clone())
            .query(&Self::event_filter(owner, id))
            .header("Prefer", "return=representation");
        single_row(self.rows(request, "delete").await?, id).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_base_url;
    use axum::{
        extract::{RawQuery, State},
        http::{header, HeaderMap, Method},
        response::IntoResponse,
        routing::any,
        Router,
    };
    use chrono::{TimeZone, Utc};
    use std::sync::{Arc, Mutex};

    const ROW: &str = r#"[{"id":"e1","user_id":"u1","title":"Review","description":null,"start_time":"2024-02-14T14:00:00+00:00","end_time":"2024-02-14T15:00:00+00:00","all_day":false}]"#;

    /// One request as seen by the fake PostgREST server
    #[derive(Debug, Clone)]
    struct Recorded {
        method: Method,
        query: String,
        prefer: Option<String>,
        apikey: Option<String>,
    }

    #[derive(Clone)]
    struct FakePostgrest {
        seen: Arc<Mutex<Vec<Recorded>>>,
        reply: &'static str,
    }

    async fn record(
        State(fake): State<FakePostgrest>,
        method: Method,
        RawQuery(query): RawQuery,
        headers: HeaderMap,
    ) -> impl IntoResponse {
        let header_value = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        fake.seen.lock().unwrap().push(Recorded {
            method,
            query: query.unwrap_or_default(),
            prefer: header_value("prefer"),
            apikey: header_value("apikey"),
        });
        ([(header::CONTENT_TYPE, "application/json")], fake.reply)
    }

    /// Start a fake PostgREST answering every call with `reply`
    async fn fake_store(reply: &'static str) -> (SupabaseStore, Arc<Mutex<Vec<Recorded>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let fake = FakePostgrest {
            seen: seen.clone(),
            reply,
        };
        let router = Router::new()
            .route("/rest/v1/calendar_events", any(record))
            .with_state(fake);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let config = SupabaseConfig {
            url: parse_base_url(&format!("http://{}", addr)).unwrap(),
            service_key: "service".to_string(),
        };
        (SupabaseStore::new(&config).unwrap(), seen)
    }

    fn sample_event() -> NewEvent {
        NewEvent {
            title: "Review".to_string(),
            description: String::new(),
            start: Utc.with_ymd_and_hms(2024, 2, 14, 14, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 2, 14, 15, 0, 0).unwrap(),
            all_day: false,
        }
    }

    fn last_request(seen: &Arc<Mutex<Vec<Recorded>>>) -> Recorded {
        seen.lock().unwrap().last().cloned().unwrap()
    }

    #[test]
    fn test_endpoint_points_at_events_table() {
        let config = SupabaseConfig {
            url: parse_base_url("https://project.supabase.co").unwrap(),
            service_key: "service".to_string(),
        };
        let store = SupabaseStore::new(&config).unwrap();
        assert_eq!(
            store.endpoint().as_str(),
            "https://project.supabase.co/rest/v1/calendar_events"
        );
    }

    #[test]
    fn test_event_row_shape() {
        let event = NewEvent {
            title: "Review".to_string(),
            description: "Quarterly".to_string(),
            start: Utc.with_ymd_and_hms(2024, 2, 14, 14, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 2, 14, 15, 0, 0).unwrap(),
            all_day: false,
        };
        let json = serde_json::to_value(EventRow::new("user-1", &event)).unwrap();
        assert_eq!(json["user_id"], "user-1");
        assert_eq!(json["title"], "Review");
        assert_eq!(json["start_time"], "2024-02-14T14:00:00Z");
        assert_eq!(json["all_day"], false);
    }

    #[test]
    fn test_single_row_not_found() {
        assert!(matches!(single_row(Vec::new(), "42"), Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_filters_by_owner_and_orders_by_start() {
        let (store, seen) = fake_store(ROW).await;
        let events = store.list_events("u1").await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "e1");
        assert_eq!(events[0].start_time, Utc.with_ymd_and_hms(2024, 2, 14, 14, 0, 0).unwrap());

        let request = last_request(&seen);
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.query, "select=*&user_id=eq.u1&order=start_time.asc");
        assert_eq!(request.apikey.as_deref(), Some("service"));
    }

    #[tokio::test]
    async fn test_create_asks_for_representation() {
        let (store, seen) = fake_store(ROW).await;
        let stored = store.create_event("u1", &sample_event()).await.unwrap();
        assert_eq!(stored.user_id, "u1");

        let request = last_request(&seen);
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.prefer.as_deref(), Some("return=representation"));
    }

    #[tokio::test]
    async fn test_create_without_returned_row_is_storage_error() {
        let (store, _) = fake_store("[]").await;
        match store.create_event("u1", &sample_event()).await {
            Err(Error::Storage(message)) => {
                assert_eq!(message, "Failed to save event - no data returned")
            }
            other => panic!("expected storage error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_and_delete_are_scoped_to_owner() {
        let (store, seen) = fake_store(ROW).await;
        store.update_event("u1", "e1", &sample_event()).await.unwrap();
        let request = last_request(&seen);
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.query, "id=eq.e1&user_id=eq.u1");
        assert_eq!(request.prefer.as_deref(), Some("return=representation"));

        store.delete_event("u1", "e1").await.unwrap();
        let request = last_request(&seen);
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.query, "id=eq.e1&user_id=eq.u1");
    }

    #[tokio::test]
    async fn test_update_and_delete_without_match_are_not_found() {
        let (store, _) = fake_store("[]").await;
        assert!(matches!(
            store.update_event("u2", "e1", &sample_event()).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            store.delete_event("u2", "e1").await,
            Err(Error::NotFound(_))
        ));
    }
}
