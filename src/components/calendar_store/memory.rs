use super::models::{CalendarEvent, NewEvent};
use super::CalendarStore;
use crate::error::{AppResult, Error};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory event storage, used when no Supabase project is configured and in tests
#[derive(Debug, Default)]
pub struct InMemoryStore {
    events: RwLock<HashMap<String, CalendarEvent>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: &str) -> Error {
    Error::NotFound(format!("event {}", id))
}

#[async_trait]
impl CalendarStore for InMemoryStore {
    async fn list_events(&self, owner: &str) -> AppResult<Vec<CalendarEvent>> {
        let events = self.events.read().await;
        let mut owned: Vec<CalendarEvent> = events
            .values()
            .filter(|event| event.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn create_event(&self, owner: &str, event: &NewEvent) -> AppResult<CalendarEvent> {
        let id = Uuid::new_v4().to_string();
        let stored = CalendarEvent {
            id: id.clone(),
            user_id: owner.to_string(),
            title: event.title.clone(),
            description: Some(event.description.clone()),
            start_time: event.start,
            end_time: event.end,
            all_day: event.all_day,
        };
        let mut events = self.events.write().await;
        events.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_event(
        &self,
        owner: &str,
        id: &str,
        event: &NewEvent,
    ) -> AppResult<CalendarEvent> {
        let mut events = self.events.write().await;
        let stored = events
            .get_mut(id)
            .filter(|stored| stored.user_id == owner)
            .ok_or_else(|| not_found(id))?;

        stored.title = event.title.clone();
        stored.description = Some(event.description.clone());
        stored.start_time = event.start;
        stored.end_time = event.end;
        stored.all_day = event.all_day;
        Ok(stored.clone())
    }

    async fn delete_event(&self, owner: &str, id: &str) -> AppResult<()> {
        let mut events = self.events.write().await;
        match events.get(id) {
            Some(stored) if stored.user_id == owner => {
                events.remove(id);
                Ok(())
            }
            _ => Err(not_found(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(title: &str, day: u32) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            description: String::new(),
            start: Utc.with_ymd_and_hms(2024, 2, day, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 2, day, 10, 0, 0).unwrap(),
            all_day: false,
        }
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_scoped() {
        let store = InMemoryStore::new();
        store.create_event("alice", &event("later", 20)).await.unwrap();
        store.create_event("alice", &event("sooner", 10)).await.unwrap();
        store.create_event("bob", &event("bob's", 5)).await.unwrap();

        let events = store.list_events("alice").await.unwrap();
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["sooner", "later"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_require_owner() {
        let store = InMemoryStore::new();
        let created = store.create_event("alice", &event("mine", 10)).await.unwrap();

        let result = store.update_event("bob", &created.id, &event("stolen", 11)).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        let result = store.delete_event("bob", &created.id).await;
        assert!(matches!(result, Err(Error::NotFound(_))));

        let updated = store
            .update_event("alice", &created.id, &event("renamed", 11))
            .await
            .unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.id, created.id);

        store.delete_event("alice", &created.id).await.unwrap();
        assert!(store.list_events("alice").await.unwrap().is_empty());
    }
}
