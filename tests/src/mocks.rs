//! Mock implementations for testing.

use async_trait::async_trait;
use capi_client::{ConversionsClient, DispatchReceipt};
use parking_lot::Mutex;
use relay_core::{CanonicalEvent, Error, Result, TenantConfig};
use std::collections::HashMap;
use std::sync::Arc;
use user_store::{UserRecord, UserStore};

/// Mock dispatcher that captures submissions in memory.
///
/// Implements the same `ConversionsClient` trait as the real
/// `GraphApiClient`, so tests can verify the exact event and the exact
/// credentials that would reach the Conversions API without any network.
#[derive(Clone)]
pub struct MockDispatcher {
    /// Every (tenant, event) pair submitted through this dispatcher.
    submissions: Arc<Mutex<Vec<(TenantConfig, CanonicalEvent)>>>,
    /// Simulate failures if set.
    should_fail: Arc<Mutex<bool>>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self {
            submissions: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Get all captured submissions.
    pub fn captured(&self) -> Vec<(TenantConfig, CanonicalEvent)> {
        self.submissions.lock().clone()
    }

    /// Get the count of captured submissions.
    pub fn submission_count(&self) -> usize {
        self.submissions.lock().len()
    }

    /// Clear captured submissions.
    pub fn clear(&self) {
        self.submissions.lock().clear();
    }

    /// Set failure mode for testing error handling.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }
}

impl Default for MockDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversionsClient for MockDispatcher {
    async fn send_event(
        &self,
        tenant: &TenantConfig,
        event: &CanonicalEvent,
    ) -> Result<DispatchReceipt> {
        if *self.should_fail.lock() {
            return Err(Error::dispatch("mock dispatcher failure"));
        }

        self.submissions
            .lock()
            .push((tenant.clone(), event.clone()));

        Ok(DispatchReceipt {
            events_received: 1,
            fbtrace_id: Some("mock-trace".into()),
        })
    }
}

/// In-memory user store with create-once semantics.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<HashMap<String, UserRecord>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<UserRecord>> {
        Ok(self.users.lock().get(external_id).cloned())
    }

    async fn ensure_user(&self, record: &UserRecord) -> Result<()> {
        if record.external_id.is_empty() {
            return Ok(());
        }

        // Same semantics as the unique constraint: first snapshot wins.
        self.users
            .lock()
            .entry(record.external_id.clone())
            .or_insert_with(|| record.clone());

        Ok(())
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(external_id: &str, email: &str) -> UserRecord {
        UserRecord {
            external_id: external_id.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn memory_store_keeps_first_snapshot() {
        let store = MemoryUserStore::new();

        store.ensure_user(&record("u-1", "first@example.com")).await.unwrap();
        store.ensure_user(&record("u-1", "second@example.com")).await.unwrap();

        let found = store.find_by_external_id("u-1").await.unwrap().unwrap();
        assert_eq!(found.email, "first@example.com");
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn memory_store_ignores_empty_external_id() {
        let store = MemoryUserStore::new();
        store.ensure_user(&record("", "x@example.com")).await.unwrap();
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn mock_dispatcher_fails_on_demand() {
        let mock = MockDispatcher::new();
        mock.set_should_fail(true);

        let tenant = TenantConfig::default();
        let event = sample_event();
        assert!(mock.send_event(&tenant, &event).await.is_err());
        assert_eq!(mock.submission_count(), 0);
    }

    fn sample_event() -> CanonicalEvent {
        use relay_core::{CustomData, StandardEvent, UserData};
        CanonicalEvent {
            event_name: StandardEvent::PageView,
            event_id: "e1".into(),
            event_time: 0,
            action_source: "website".into(),
            event_source_url: None,
            user_data: UserData::default(),
            custom_data: CustomData::default(),
        }
    }
}
