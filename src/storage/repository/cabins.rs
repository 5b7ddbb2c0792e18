// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Cabin repository.
//!
//! Cabins are the accommodation candidates users vote on. Votes are a set
//! of user IDs embedded in the cabin document, so adding a vote twice is
//! a no-op and deleting a cabin takes its votes with it.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{DataStore, StorageError, StorageResult};

/// Cabin document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredCabin {
    /// Unique cabin identifier (UUID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Listing URL (e.g. a booking page)
    pub url: Option<String>,
    /// Preview image URL
    pub image_url: Option<String>,
    /// Free-form description
    pub description: Option<String>,
    /// User ID of the admin who added the cabin
    pub created_by: String,
    /// When the cabin was added
    pub created_at: DateTime<Utc>,
    /// IDs of users who voted for this cabin
    #[serde(default)]
    pub votes: BTreeSet<String>,
}

impl StoredCabin {
    pub fn new(
        name: String,
        url: Option<String>,
        image_url: Option<String>,
        description: Option<String>,
        created_by: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            url,
            image_url,
            description,
            created_by,
            created_at: Utc::now(),
            votes: BTreeSet::new(),
        }
    }
}

/// Fields of a cabin that can be changed after creation. `None` leaves the
/// stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct CabinChanges {
    pub name: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl CabinChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.url.is_none()
            && self.image_url.is_none()
            && self.description.is_none()
    }
}

/// Repository for cabin documents.
pub struct CabinRepository<'a> {
    store: &'a DataStore,
}

impl<'a> CabinRepository<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    pub fn exists(&self, cabin_id: &str) -> bool {
        self.store.exists(self.store.paths().cabin(cabin_id))
    }

    pub fn get(&self, cabin_id: &str) -> StorageResult<StoredCabin> {
        let path = self.store.paths().cabin(cabin_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("Cabin {cabin_id}")));
        }
        self.store.read_json(path)
    }

    pub fn create(&self, cabin: &StoredCabin) -> StorageResult<()> {
        if self.exists(&cabin.id) {
            return Err(StorageError::AlreadyExists(format!("Cabin {}", cabin.id)));
        }
        self.store
            .write_json(self.store.paths().cabin(&cabin.id), cabin)
    }

    pub fn update(&self, cabin: &StoredCabin) -> StorageResult<()> {
        if !self.exists(&cabin.id) {
            return Err(StorageError::NotFound(format!("Cabin {}", cabin.id)));
        }
        self.store
            .write_json(self.store.paths().cabin(&cabin.id), cabin)
    }

    pub fn delete(&self, cabin_id: &str) -> StorageResult<()> {
        if !self.exists(cabin_id) {
            return Err(StorageError::NotFound(format!("Cabin {cabin_id}")));
        }
        self.store.delete(self.store.paths().cabin(cabin_id))
    }

    pub fn list_all(&self) -> StorageResult<Vec<StoredCabin>> {
        let ids = self
            .store
            .list_files(self.store.paths().cabins_dir(), "json")?;

        let mut cabins = Vec::new();
        for id in ids {
            if let Ok(cabin) = self.get(&id) {
                cabins.push(cabin);
            }
        }
        Ok(cabins)
    }

    /// Apply a sparse update to a cabin.
    pub fn apply(&self, cabin_id: &str, changes: CabinChanges) -> StorageResult<StoredCabin> {
        let mut cabin = self.get(cabin_id)?;

        if let Some(name) = changes.name {
            cabin.name = name;
        }
        if let Some(url) = changes.url {
            cabin.url = Some(url);
        }
        if let Some(image_url) = changes.image_url {
            cabin.image_url = Some(image_url);
        }
        if let Some(description) = changes.description {
            cabin.description = Some(description);
        }

        self.update(&cabin)?;
        Ok(cabin)
    }

    /// Set or clear a user's vote. Re-voting and re-unvoting are no-ops.
    /// Returns the updated vote count.
    pub fn set_vote(&self, cabin_id: &str, user_id: &str, vote: bool) -> StorageResult<usize> {
        let mut cabin = self.get(cabin_id)?;

        if vote {
            cabin.votes.insert(user_id.to_string());
        } else {
            cabin.votes.remove(user_id);
        }

        self.update(&cabin)?;
        Ok(cabin.votes.len())
    }

    /// Remove a user's votes from every cabin (used when deleting a user).
    pub fn remove_votes_for_user(&self, user_id: &str) -> StorageResult<()> {
        for mut cabin in self.list_all()? {
            if cabin.votes.remove(user_id) {
                self.update(&cabin)?;
            }
        }
        Ok(())
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

    fn sample_cabin(name: &str) -> StoredCabin {
        StoredCabin::new(name.into(), None, None, None, "admin-1".into())
    }

    #[test]
    fn vote_toggle_is_idempotent() {
        let (store, _dir) = test_store();
        let repo = CabinRepository::new(&store);

        let cabin = sample_cabin("Hütte Nord");
        repo.create(&cabin).unwrap();

        assert_eq!(repo.set_vote(&cabin.id, "u1", true).unwrap(), 1);
        assert_eq!(repo.set_vote(&cabin.id, "u1", true).unwrap(), 1);
        assert_eq!(repo.set_vote(&cabin.id, "u2", true).unwrap(), 2);
        assert_eq!(repo.set_vote(&cabin.id, "u1", false).unwrap(), 1);
        assert_eq!(repo.set_vote(&cabin.id, "u1", false).unwrap(), 1);
    }

    #[test]
    fn vote_on_missing_cabin_is_not_found() {
        let (store, _dir) = test_store();
        let repo = CabinRepository::new(&store);
        assert!(matches!(
            repo.set_vote("missing", "u1", true),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn apply_changes_partial_fields() {
        let (store, _dir) = test_store();
        let repo = CabinRepository::new(&store);

        let cabin = sample_cabin("Hütte Nord");
        repo.create(&cabin).unwrap();

        let updated = repo
            .apply(
                &cabin.id,
                CabinChanges {
                    description: Some("Sauna inklusive".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Hütte Nord");
        assert_eq!(updated.description.as_deref(), Some("Sauna inklusive"));
        assert!(updated.url.is_none());
    }

    #[test]
    fn remove_votes_for_user_sweeps_all_cabins() {
        let (store, _dir) = test_store();
        let repo = CabinRepository::new(&store);

        let a = sample_cabin("A");
        let b = sample_cabin("B");
        repo.create(&a).unwrap();
        repo.create(&b).unwrap();
        repo.set_vote(&a.id, "u1", true).unwrap();
        repo.set_vote(&b.id, "u1", true).unwrap();
        repo.set_vote(&b.id, "u2", true).unwrap();

        repo.remove_votes_for_user("u1").unwrap();

        assert!(repo.get(&a.id).unwrap().votes.is_empty());
        assert_eq!(repo.get(&b.id).unwrap().votes.len(), 1);
    }

    #[test]
    fn delete_takes_votes_along() {
        let (store, _dir) = test_store();
        let repo = CabinRepository::new(&store);

        let cabin = sample_cabin("Hütte Süd");
        repo.create(&cabin).unwrap();
        repo.set_vote(&cabin.id, "u1", true).unwrap();

        repo.delete(&cabin.id).unwrap();
        assert!(!repo.exists(&cabin.id));
    }
}
