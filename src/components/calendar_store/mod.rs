use crate::error::AppResult;
use async_trait::async_trait;

pub mod memory;
pub mod models;
pub mod summary;
pub mod supabase;

pub use memory::InMemoryStore;
pub use models::{CalendarEvent, EventSummary, EventView, NewEvent};
pub use summary::summarize;
pub use supabase::SupabaseStore;

/// Durable storage of calendar events, scoped to the owning user
#[async_trait]
pub trait CalendarStore: Send + Sync + 'static {
    /// All events of `owner`, earliest start first
    async fn list_events(&self, owner: &str) -> AppResult<Vec<CalendarEvent>>;

    /// Store a new event for `owner`
    async fn create_event(&self, owner: &str, event: &NewEvent) -> AppResult<CalendarEvent>;

    /// Replace the fields of an existing event
    async fn update_event(
        &self,
        owner: &str,
        id: &str,
        event: &NewEvent,
    ) -> AppResult<CalendarEvent>;

    /// Delete an event
    async fn delete_event(&self, owner: &str, id: &str) -> AppResult<()>;
}
