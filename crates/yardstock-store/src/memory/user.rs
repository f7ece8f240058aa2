//! In-memory user store.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use yardstock_core::error::AppError;
use yardstock_core::result::AppResult;
use yardstock_core::types::UserId;
use yardstock_entity::user::{CreateUser, User};

use crate::traits::UserStore;

/// `DashMap`-backed user store with case-insensitive username and email
/// indexes.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<UserId, User>>,
    by_username: Arc<DashMap<String, UserId>>,
    by_email: Arc<DashMap<String, UserId>>,
    next_id: Arc<AtomicI64>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn claim(index: &DashMap<String, UserId>, key: String, id: UserId) -> bool {
        match index.entry(key) {
            Entry::Occupied(existing) => *existing.get() == id,
            Entry::Vacant(slot) => {
                slot.insert(id);
                true
            }
        }
    }

    fn release(index: &DashMap<String, UserId>, key: &str, id: UserId) {
        index.remove_if(key, |_, owner| *owner == id);
    }
}

fn index_key(value: &str) -> String {
    value.trim().to_lowercase()
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_user_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let id = self.by_email.get(&index_key(email)).map(|e| *e.value());
        match id {
            Some(id) => self.get_user_by_id(id).await,
            None => Ok(None),
        }
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let id = self.by_username.get(&index_key(username)).map(|e| *e.value());
        match id {
            Some(id) => self.get_user_by_id(id).await,
            None => Ok(None),
        }
    }

    async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        let id = UserId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let username_key = index_key(&user.username);
        let email_key = index_key(&user.email);

        if !Self::claim(&self.by_username, username_key.clone(), id) {
            return Err(AppError::conflict(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }
        if !Self::claim(&self.by_email, email_key, id) {
            Self::release(&self.by_username, &username_key, id);
            return Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }

        let record = user.into_user(id, Utc::now());
        self.users.insert(id, record.clone());
        debug!(user_id = %id, "Created user");
        Ok(record)
    }

    async fn update_user(&self, user: &User) -> AppResult<()> {
        let mut entry = self
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;

        let old_username = index_key(&entry.username);
        let new_username = index_key(&user.username);
        if old_username != new_username {
            if !Self::claim(&self.by_username, new_username, user.id) {
                return Err(AppError::conflict(format!(
                    "Username '{}' is already taken",
                    user.username
                )));
            }
            Self::release(&self.by_username, &old_username, user.id);
        }

        let old_email = index_key(&entry.email);
        let new_email = index_key(&user.email);
        if old_email != new_email {
            if !Self::claim(&self.by_email, new_email, user.id) {
                return Err(AppError::conflict(format!(
                    "Email '{}' is already registered",
                    user.email
                )));
            }
            Self::release(&self.by_email, &old_email, user.id);
        }

        // Strictly increasing so `record_login` always sees the change.
        let mut updated = user.clone();
        updated.updated_at = Utc::now().max(entry.updated_at + Duration::nanoseconds(1));
        *entry = updated;
        Ok(())
    }

    async fn record_login(
        &self,
        id: UserId,
        observed_updated_at: DateTime<Utc>,
        at: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let Some(mut entry) = self.users.get_mut(&id) else {
            return Ok(None);
        };
        if !entry.is_active || entry.updated_at != observed_updated_at {
            return Ok(None);
        }
        entry.last_login_at = Some(at);
        Ok(Some(entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yardstock_core::types::TenantId;
    use yardstock_entity::user::UserRole;

    fn new_user(username: &str, email: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Operator,
            is_enterprise_user: false,
            primary_tenant_id: TenantId::from("houston"),
            customer_id: None,
            contact_type: None,
            is_active: true,
            tenant_access: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_indexes() {
        let store = MemoryUserStore::new();
        let a = store.create_user(new_user("Alice", "alice@example.com")).await.unwrap();
        let b = store.create_user(new_user("bob", "bob@example.com")).await.unwrap();
        assert_ne!(a.id, b.id);

        let found = store.get_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, a.id);
        let found = store.get_user_by_email("BOB@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, b.id);
        assert!(store.get_user_by_username("carol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryUserStore::new();
        store.create_user(new_user("alice", "alice@example.com")).await.unwrap();
        let err = store
            .create_user(new_user("ALICE", "other@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, yardstock_core::error::ErrorKind::Conflict);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_releases_username() {
        let store = MemoryUserStore::new();
        store.create_user(new_user("alice", "alice@example.com")).await.unwrap();
        assert!(store.create_user(new_user("bob", "alice@example.com")).await.is_err());
        assert!(store.create_user(new_user("bob", "bob@example.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_record_login_only_stamps_unchanged_active_user() {
        let store = MemoryUserStore::new();
        let user = store.create_user(new_user("alice", "alice@example.com")).await.unwrap();
        let at = Utc::now();

        let stamped = store.record_login(user.id, user.updated_at, at).await.unwrap().unwrap();
        assert_eq!(stamped.last_login_at, Some(at));
        assert_eq!(stamped.updated_at, user.updated_at);

        let mut changed = stamped.clone();
        changed.is_active = false;
        store.update_user(&changed).await.unwrap();
        assert!(store.record_login(user.id, user.updated_at, at).await.unwrap().is_none());

        let current = store.get_user_by_id(user.id).await.unwrap().unwrap();
        assert!(!current.is_active);
        assert!(store.record_login(user.id, current.updated_at, at).await.unwrap().is_none());
        assert!(store.record_login(UserId(99), at, at).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let store = MemoryUserStore::new();
        let mut user = new_user("alice", "alice@example.com").into_user(UserId(99), Utc::now());
        user.is_active = false;
        let err = store.update_user(&user).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
