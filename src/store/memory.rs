//! 内存存储实现
//!
//! 进程退出后数据即丢失，适合单机运行和测试

use super::{DefinitionStore, EventStore, StoreResult};
use crate::error::StoreError;
use crate::health::{HealthCheckDefinition, NewHealthCheck, NewProbeEvent, ProbeEvent};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// 同时实现定义存储和事件存储的内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    definitions: RwLock<BTreeMap<i64, HealthCheckDefinition>>,
    events: RwLock<Vec<ProbeEvent>>,
    next_definition_id: AtomicI64,
    next_event_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 事件总数
    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }
}

#[async_trait]
impl DefinitionStore for MemoryStore {
    async fn get_definition(&self, id: i64) -> StoreResult<HealthCheckDefinition> {
        self.definitions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_definition(&self, new: NewHealthCheck) -> StoreResult<HealthCheckDefinition> {
        let id = self.next_definition_id.fetch_add(1, Ordering::SeqCst) + 1;
        let definition = new.with_id(id);
        self.definitions
            .write()
            .await
            .insert(id, definition.clone());
        Ok(definition)
    }

    async fn list_definitions(&self) -> StoreResult<Vec<HealthCheckDefinition>> {
        Ok(self.definitions.read().await.values().cloned().collect())
    }

    async fn delete_definition(&self, id: i64) -> StoreResult<()> {
        self.definitions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn append_event(&self, event: NewProbeEvent) -> StoreResult<ProbeEvent> {
        let mut events = self.events.write().await;
        let id = self.next_event_id.fetch_add(1, Ordering::SeqCst) + 1;
        let event = event.with_id(id);
        events.push(event.clone());
        Ok(event)
    }

    async fn most_recent_event(&self, health_check_id: i64) -> StoreResult<ProbeEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|event| event.health_check_id == health_check_id)
            .max_by_key(|event| (event.created_at, event.id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_events(&self, health_check_id: i64) -> StoreResult<Vec<ProbeEvent>> {
        let mut events: Vec<ProbeEvent> = self
            .events
            .read()
            .await
            .iter()
            .filter(|event| event.health_check_id == health_check_id)
            .cloned()
            .collect();
        events.sort_by_key(|event| (event.created_at, event.id));
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_check(url: &str) -> NewHealthCheck {
        NewHealthCheck {
            interval_seconds: 5,
            url: url.to_string(),
            http_method: "GET".to_string(),
            headers_json: "{}".to_string(),
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_definition_crud() {
        let store = MemoryStore::new();

        let first = store
            .create_definition(new_check("http://a.example"))
            .await
            .unwrap();
        let second = store
            .create_definition(new_check("http://b.example"))
            .await
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        assert_eq!(store.get_definition(2).await.unwrap().url, "http://b.example");
        assert_eq!(store.list_definitions().await.unwrap().len(), 2);

        store.delete_definition(1).await.unwrap();
        assert_eq!(store.get_definition(1).await, Err(StoreError::NotFound));
        assert_eq!(store.delete_definition(1).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_most_recent_event_is_scoped_per_health_check() {
        let store = MemoryStore::new();

        assert_eq!(store.most_recent_event(1).await, Err(StoreError::NotFound));

        store
            .append_event(NewProbeEvent::now(1, "200 OK"))
            .await
            .unwrap();
        store
            .append_event(NewProbeEvent::now(2, "500 Internal Server Error"))
            .await
            .unwrap();
        store
            .append_event(NewProbeEvent::now(1, "404 Not Found"))
            .await
            .unwrap();

        assert_eq!(
            store.most_recent_event(1).await.unwrap().status,
            "404 Not Found"
        );
        assert_eq!(
            store.most_recent_event(2).await.unwrap().status,
            "500 Internal Server Error"
        );

        let statuses: Vec<String> = store
            .list_events(1)
            .await
            .unwrap()
            .into_iter()
            .map(|event| event.status)
            .collect();
        assert_eq!(statuses, vec!["200 OK", "404 Not Found"]);
        assert_eq!(store.event_count().await, 3);
    }
}
