//! In-memory credential store

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use crate::error::DbError;
use crate::models::{NewUser, UserRecord};
use crate::store::CredentialStore;

/// Process-local store backed by a hash map
///
/// Records live as long as the process. Cloning shares the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DbError> {
        Ok(self.users.read().get(email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, DbError> {
        let mut users = self.users.write();
        // Records are never removed, so the next id is always free.
        let id = users.len() as i64 + 1;

        match users.entry(user.email) {
            Entry::Occupied(entry) => Err(DbError::Duplicate(format!(
                "User '{}' already exists",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                let record = UserRecord {
                    id,
                    email: entry.key().clone(),
                    password_hash: user.password_hash,
                    name: user.name,
                    created_at: Utc::now(),
                };
                Ok(entry.insert(record).clone())
            }
        }
    }

    async fn count(&self) -> Result<i64, DbError> {
        Ok(self.users.read().len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryStore::new();

        let created = store.insert(new_user("a@x.com")).await.unwrap();
        assert_eq!(created.id, 1);

        let found = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.email, "a@x.com");
        assert!(store.find_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_keeps_first_record() {
        let store = MemoryStore::new();

        store.insert(new_user("a@x.com")).await.unwrap();
        let mut second = new_user("a@x.com");
        second.password_hash = "other".to_string();
        let err = store.insert(second).await.unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(store.count().await.unwrap(), 1);
        let found = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "hash");
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.insert(new_user("a@x.com")).await.unwrap();
        assert!(other.find_by_email("a@x.com").await.unwrap().is_some());
    }
}
