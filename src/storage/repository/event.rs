// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Event repository.
//!
//! There is exactly one event per deployment, stored as a singleton
//! document. The registration password gates account creation and is
//! never exposed through the read path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{DataStore, StorageError, StorageResult};

/// The singleton event document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredEvent {
    /// Display title of the event
    pub title: String,
    /// When the event starts
    pub event_date: Option<DateTime<Utc>>,
    /// When the event ends
    pub event_end_date: Option<DateTime<Utc>>,
    /// Venue description
    pub location: Option<String>,
    /// Participant cap, if any
    pub max_participants: Option<u32>,
    /// Shared secret required to register an account
    pub registration_password: String,
    /// When the event record was created
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl StoredEvent {
    /// A fresh event record with nothing scheduled yet.
    pub fn new(title: String, registration_password: String) -> Self {
        let now = Utc::now();
        Self {
            title,
            event_date: None,
            event_end_date: None,
            location: None,
            max_participants: None,
            registration_password,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields of the event that can be changed after creation. `None` leaves
/// the stored value untouched; the struct itself is the allow-list of
/// updatable fields.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub event_end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub max_participants: Option<u32>,
    pub registration_password: Option<String>,
}

impl EventChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.event_date.is_none()
            && self.event_end_date.is_none()
            && self.location.is_none()
            && self.max_participants.is_none()
            && self.registration_password.is_none()
    }
}

/// Repository for the singleton event document.
pub struct EventRepository<'a> {
    store: &'a DataStore,
}

impl<'a> EventRepository<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Check whether an event document exists yet.
    pub fn exists(&self) -> bool {
        self.store.exists(self.store.paths().event())
    }

    /// Get the event document.
    pub fn get(&self) -> StorageResult<StoredEvent> {
        let path = self.store.paths().event();
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound("Event".to_string()));
        }
        self.store.read_json(path)
    }

    /// Write the event document, creating it if absent.
    pub fn put(&self, event: &StoredEvent) -> StorageResult<()> {
        self.store.write_json(self.store.paths().event(), event)
    }

    /// Apply a sparse update and bump `updated_at`. Returns the new state.
    pub fn apply(&self, changes: EventChanges) -> StorageResult<StoredEvent> {
        let mut event = self.get()?;

        if let Some(title) = changes.title {
            event.title = title;
        }
        if let Some(date) = changes.event_date {
            event.event_date = Some(date);
        }
        if let Some(date) = changes.event_end_date {
            event.event_end_date = Some(date);
        }
        if let Some(location) = changes.location {
            event.location = Some(location);
        }
        if let Some(max) = changes.max_participants {
            event.max_participants = Some(max);
        }
        if let Some(password) = changes.registration_password {
            event.registration_password = password;
        }
        event.updated_at = Utc::now();

        self.put(&event)?;
        Ok(event)
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
    fn get_without_event_is_not_found() {
        let (store, _dir) = test_store();
        let repo = EventRepository::new(&store);
        assert!(matches!(repo.get(), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn put_then_get_round_trips() {
        let (store, _dir) = test_store();
        let repo = EventRepository::new(&store);

        let event = StoredEvent::new("LAN 2026".into(), "geheim".into());
        repo.put(&event).unwrap();

        let loaded = repo.get().unwrap();
        assert_eq!(loaded, event);
    }

    #[test]
    fn apply_updates_only_given_fields() {
        let (store, _dir) = test_store();
        let repo = EventRepository::new(&store);

        let event = StoredEvent::new("LAN 2026".into(), "geheim".into());
        repo.put(&event).unwrap();

        let updated = repo
            .apply(EventChanges {
                location: Some("Harz".into()),
                max_participants: Some(24),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.title, "LAN 2026");
        assert_eq!(updated.location.as_deref(), Some("Harz"));
        assert_eq!(updated.max_participants, Some(24));
        assert_eq!(updated.registration_password, "geheim");
        assert!(updated.updated_at >= event.updated_at);
    }

    #[test]
    fn empty_changes_detects_no_op() {
        assert!(EventChanges::default().is_empty());
        assert!(!EventChanges {
            title: Some("x".into()),
            ..Default::default()
        }
        .is_empty());
    }
}
