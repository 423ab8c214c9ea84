// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store abstraction and the in-memory implementation.
//!
//! The TTL here is a backstop against process/store restarts. The
//! user-visible expiry is the engine's idle warning/timeout check; the
//! two thresholds are independent and never conflated.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use faena_core::FaenaError;

use crate::session::Session;

/// Keyed session storage, atomic per key. No cross-key transactions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, phone: &str) -> Result<Option<Session>, FaenaError>;

    async fn set(&self, phone: &str, session: Session, ttl: Duration) -> Result<(), FaenaError>;

    async fn delete(&self, phone: &str) -> Result<(), FaenaError>;
}

/// In-process session store on a concurrent map. Expiry is evaluated
/// lazily on `get`; there is no background sweeper.
pub struct InMemorySessionStore {
    sessions: DashMap<String, (Session, Instant)>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, phone: &str) -> Result<Option<Session>, FaenaError> {
        if let Some(entry) = self.sessions.get(phone) {
            let (session, deadline) = entry.value();
            if Instant::now() < *deadline {
                return Ok(Some(session.clone()));
            }
        } else {
            return Ok(None);
        }
        // Expired entry; drop it outside the read guard.
        self.sessions.remove(phone);
        Ok(None)
    }

    async fn set(&self, phone: &str, session: Session, ttl: Duration) -> Result<(), FaenaError> {
        self.sessions
            .insert(phone.to_string(), (session, Instant::now() + ttl));
        Ok(())
    }

    async fn delete(&self, phone: &str) -> Result<(), FaenaError> {
        self.sessions.remove(phone);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Step;

    fn make_session(phone: &str) -> Session {
        Session::new(phone, None, Step::Menu)
    }

    #[tokio::test]
    async fn set_and_get_roundtrips() {
        let store = InMemorySessionStore::new();
        store
            .set("123", make_session("123"), Duration::from_secs(60))
            .await
            .unwrap();

        let session = store.get("123").await.unwrap().unwrap();
        assert_eq!(session.phone, "123");
        assert_eq!(session.step, Step::Menu);
    }

    #[tokio::test]
    async fn get_unknown_phone_returns_none() {
        let store = InMemorySessionStore::new();
        assert!(store.get("999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_entries_vanish_on_get() {
        let store = InMemorySessionStore::new();
        store
            .set("123", make_session("123"), Duration::from_millis(0))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(store.get("123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_session() {
        let store = InMemorySessionStore::new();
        store
            .set("123", make_session("123"), Duration::from_secs(60))
            .await
            .unwrap();
        store.delete("123").await.unwrap();
        assert!(store.get("123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sessions_are_independent_per_phone() {
        let store = InMemorySessionStore::new();
        store
            .set("111", make_session("111"), Duration::from_secs(60))
            .await
            .unwrap();
        store
            .set("222", make_session("222"), Duration::from_secs(60))
            .await
            .unwrap();

        store.delete("111").await.unwrap();
        assert!(store.get("111").await.unwrap().is_none());
        assert!(store.get("222").await.unwrap().is_some());
    }
}
