// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Push subscription repository.
//!
//! Bookkeeping only: the browser's subscription (endpoint plus key
//! material) is stored per user so an out-of-band sender can deliver
//! notifications. One subscription per (user, endpoint) pair; saving the
//! same endpoint again refreshes the key material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{DataStore, StorageResult};

/// Push subscription document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredSubscription {
    /// Unique subscription identifier (UUID)
    pub id: String,
    /// Owning user's ID
    pub user_id: String,
    /// Push service endpoint URL
    pub endpoint: String,
    /// Client public key (P-256, base64url)
    pub p256dh: String,
    /// Client auth secret (base64url)
    pub auth: String,
    /// When the subscription was stored or last refreshed
    pub created_at: DateTime<Utc>,
}

/// Repository for push subscriptions.
pub struct SubscriptionRepository<'a> {
    store: &'a DataStore,
}

impl<'a> SubscriptionRepository<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    fn get(&self, subscription_id: &str) -> StorageResult<StoredSubscription> {
        self.store
            .read_json(self.store.paths().subscription(subscription_id))
    }

    pub fn list_all(&self) -> StorageResult<Vec<StoredSubscription>> {
        let ids = self
            .store
            .list_files(self.store.paths().subscriptions_dir(), "json")?;

        let mut subscriptions = Vec::new();
        for id in ids {
            if let Ok(subscription) = self.get(&id) {
                subscriptions.push(subscription);
            }
        }
        Ok(subscriptions)
    }

    /// Store a subscription, replacing any existing one for the same
    /// (user, endpoint) pair.
    pub fn upsert(
        &self,
        user_id: &str,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> StorageResult<StoredSubscription> {
        let existing = self
            .list_all()?
            .into_iter()
            .find(|s| s.user_id == user_id && s.endpoint == endpoint);

        let subscription = StoredSubscription {
            id: existing
                .map(|s| s.id)
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            user_id: user_id.to_string(),
            endpoint: endpoint.to_string(),
            p256dh: p256dh.to_string(),
            auth: auth.to_string(),
            created_at: Utc::now(),
        };

        self.store.write_json(
            self.store.paths().subscription(&subscription.id),
            &subscription,
        )?;
        Ok(subscription)
    }

    /// Delete a user's subscriptions. With `endpoint` given, only that
    /// one; otherwise all of them. Returns how many were removed.
    pub fn delete_for_user(
        &self,
        user_id: &str,
        endpoint: Option<&str>,
    ) -> StorageResult<usize> {
        let mut removed = 0;
        for subscription in self.list_all()? {
            if subscription.user_id != user_id {
                continue;
            }
            if let Some(endpoint) = endpoint {
                if subscription.endpoint != endpoint {
                    continue;
                }
            }
            self.store
                .delete(self.store.paths().subscription(&subscription.id))?;
            removed += 1;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    fn test_store() -> (DataStore, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let mut store = DataStore::new(StoragePaths::new(dir.path()));
        store.initialize().expect("initialize");
        (store, dir)
    }

    #[test]
    fn upsert_replaces_same_endpoint() {
        let (store, _dir) = test_store();
        let repo = SubscriptionRepository::new(&store);

        let first = repo
            .upsert("u1", "https://push.example/a", "key1", "auth1")
            .unwrap();
        let second = repo
            .upsert("u1", "https://push.example/a", "key2", "auth2")
            .unwrap();

        assert_eq!(first.id, second.id);

        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].p256dh, "key2");
    }

    #[test]
    fn distinct_endpoints_coexist() {
        let (store, _dir) = test_store();
        let repo = SubscriptionRepository::new(&store);

        repo.upsert("u1", "https://push.example/a", "k", "a").unwrap();
        repo.upsert("u1", "https://push.example/b", "k", "a").unwrap();

        assert_eq!(repo.list_all().unwrap().len(), 2);
    }

    #[test]
    fn delete_for_user_scopes_by_endpoint() {
        let (store, _dir) = test_store();
        let repo = SubscriptionRepository::new(&store);

        repo.upsert("u1", "https://push.example/a", "k", "a").unwrap();
        repo.upsert("u1", "https://push.example/b", "k", "a").unwrap();
        repo.upsert("u2", "https://push.example/a", "k", "a").unwrap();

        let removed = repo
            .delete_for_user("u1", Some("https://push.example/a"))
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(repo.list_all().unwrap().len(), 2);

        let removed = repo.delete_for_user("u1", None).unwrap();
        assert_eq!(removed, 1);

        let remaining = repo.list_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user_id, "u2");
    }
}
