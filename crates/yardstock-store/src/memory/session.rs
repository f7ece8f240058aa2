//! In-memory session store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use yardstock_core::error::AppError;
use yardstock_core::result::AppResult;
use yardstock_core::types::{SessionId, UserId};
use yardstock_entity::session::Session;

use crate::traits::SessionStore;

/// `DashMap`-backed session store.
///
/// Sessions are keyed by id with a secondary index from refresh token
/// fingerprint to session id. Single-session mutations go through
/// `get_mut`, which holds the shard lock for the read-modify-write.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<DashMap<SessionId, Session>>,
    by_refresh: Arc<DashMap<String, SessionId>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, active or not.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create_session(&self, session: &Session) -> AppResult<()> {
        match self.sessions.entry(session.id.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::conflict(format!(
                    "Session {} already exists",
                    session.id
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(session.clone());
            }
        }
        self.by_refresh
            .insert(session.refresh_token_hash.clone(), session.id.clone());
        debug!(session_id = %session.id, user_id = %session.user_id, "Stored session");
        Ok(())
    }

    async fn get_session_by_id(&self, id: &SessionId) -> AppResult<Option<Session>> {
        Ok(self.sessions.get(id).map(|s| s.value().clone()))
    }

    async fn get_session_by_refresh_token(
        &self,
        refresh_token_hash: &str,
    ) -> AppResult<Option<Session>> {
        let id = self
            .by_refresh
            .get(refresh_token_hash)
            .map(|e| e.value().clone());
        match id {
            Some(id) => self.get_session_by_id(&id).await,
            None => Ok(None),
        }
    }

    async fn update_session(&self, session: &Session) -> AppResult<()> {
        let mut entry = self
            .sessions
            .get_mut(&session.id)
            .ok_or_else(|| AppError::not_found(format!("Session {} not found", session.id)))?;
        if entry.refresh_token_hash != session.refresh_token_hash {
            self.by_refresh.remove(&entry.refresh_token_hash);
            self.by_refresh
                .insert(session.refresh_token_hash.clone(), session.id.clone());
        }
        *entry = session.clone();
        Ok(())
    }

    async fn touch_session(&self, id: &SessionId, at: DateTime<Utc>) -> AppResult<bool> {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                if at > entry.last_used_at {
                    entry.last_used_at = at;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn invalidate_session(&self, id: &SessionId) -> AppResult<bool> {
        match self.sessions.get_mut(id) {
            Some(mut entry) if entry.is_active => {
                entry.is_active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn invalidate_all_sessions_for_user(&self, user_id: UserId) -> AppResult<u64> {
        let mut count = 0u64;
        for mut entry in self.sessions.iter_mut() {
            if entry.user_id == user_id && entry.is_active {
                entry.is_active = false;
                count += 1;
            }
        }
        debug!(user_id = %user_id, count, "Invalidated user sessions");
        Ok(count)
    }

    async fn delete_expired_sessions(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let mut removed = Vec::new();
        self.sessions.retain(|_, session| {
            if session.refresh_expires_at < before {
                removed.push(session.refresh_token_hash.clone());
                false
            } else {
                true
            }
        });
        for hash in &removed {
            self.by_refresh.remove(hash);
        }
        Ok(removed.len() as u64)
    }

    async fn list_active_sessions_for_user(&self, user_id: UserId) -> AppResult<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .sessions
            .iter()
            .filter(|e| e.user_id == user_id && e.is_active)
            .map(|e| e.value().clone())
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use yardstock_core::types::TenantId;
    use yardstock_entity::access::TenantAccess;
    use yardstock_entity::user::UserRole;

    fn session(id: &str, user: i64, created_at: DateTime<Utc>) -> Session {
        Session {
            id: SessionId::from(id),
            user_id: UserId(user),
            tenant_id: TenantId::from("houston"),
            token_hash: format!("access-{id}"),
            refresh_token_hash: format!("refresh-{id}"),
            tenant_access: TenantAccess::new("houston", UserRole::Operator),
            is_active: true,
            expires_at: created_at + Duration::minutes(60),
            refresh_expires_at: created_at + Duration::hours(168),
            created_at,
            last_used_at: created_at,
            ip_address: None,
            user_agent: None,
        }
    }

    #[tokio::test]
    async fn test_lookup_by_refresh_hash() {
        let store = MemorySessionStore::new();
        store.create_session(&session("s1", 1, Utc::now())).await.unwrap();

        let found = store
            .get_session_by_refresh_token("refresh-s1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id.as_str(), "s1");
        assert!(store
            .get_session_by_refresh_token("refresh-s2")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_concurrent_create_same_id_has_single_winner() {
        let store = MemorySessionStore::new();
        let now = Utc::now();
        let first = session("s1", 1, now);
        let mut second = session("s1", 2, now);
        second.refresh_token_hash = "refresh-other".to_string();

        let (a, b) = tokio::join!(store.create_session(&first), store.create_session(&second));
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        assert_eq!(store.len(), 1);

        let stored = store.get_session_by_id(&SessionId::from("s1")).await.unwrap().unwrap();
        let winner_refresh = if a.is_ok() { "refresh-s1" } else { "refresh-other" };
        assert_eq!(stored.refresh_token_hash, winner_refresh);
        let loser_refresh = if a.is_ok() { "refresh-other" } else { "refresh-s1" };
        assert!(store.get_session_by_refresh_token(loser_refresh).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalidate_has_single_winner() {
        let store = MemorySessionStore::new();
        store.create_session(&session("s1", 1, Utc::now())).await.unwrap();

        let id = SessionId::from("s1");
        let (a, b) = tokio::join!(store.invalidate_session(&id), store.invalidate_session(&id));
        assert!(a.unwrap() ^ b.unwrap());
        assert!(!store.invalidate_session(&SessionId::from("missing")).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalidate_all_for_user() {
        let store = MemorySessionStore::new();
        let now = Utc::now();
        store.create_session(&session("a", 1, now)).await.unwrap();
        store.create_session(&session("b", 1, now)).await.unwrap();
        store.create_session(&session("c", 2, now)).await.unwrap();

        assert_eq!(store.invalidate_all_sessions_for_user(UserId(1)).await.unwrap(), 2);
        assert_eq!(store.invalidate_all_sessions_for_user(UserId(1)).await.unwrap(), 0);
        assert_eq!(
            store.list_active_sessions_for_user(UserId(2)).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_delete_expired_uses_refresh_window() {
        let store = MemorySessionStore::new();
        let now = Utc::now();
        store
            .create_session(&session("old", 1, now - Duration::days(30)))
            .await
            .unwrap();
        store.create_session(&session("new", 1, now)).await.unwrap();

        assert_eq!(store.delete_expired_sessions(now).await.unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert!(store
            .get_session_by_refresh_token("refresh-old")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_active_newest_first() {
        let store = MemorySessionStore::new();
        let now = Utc::now();
        store
            .create_session(&session("first", 1, now - Duration::minutes(5)))
            .await
            .unwrap();
        store.create_session(&session("second", 1, now)).await.unwrap();

        let listed = store.list_active_sessions_for_user(UserId(1)).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["second", "first"]);
    }
}
