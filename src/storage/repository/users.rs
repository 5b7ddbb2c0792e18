// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! User repository.
//!
//! Users carry the credential record (password hash, admin flag) plus the
//! attendance flag and notification preferences. Username and email are
//! unique across all records; uniqueness is enforced by scanning, which is
//! fine at LAN party scale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{DataStore, StorageError, StorageResult};

fn default_true() -> bool {
    true
}

/// User record stored in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID)
    pub id: String,
    /// Login name, unique
    pub username: String,
    /// Contact address, unique
    pub email: String,
    /// PHC-encoded password hash
    pub password_hash: String,
    /// Whether the user may use admin endpoints
    pub is_admin: bool,
    /// Whether the user plans to attend the event
    #[serde(default)]
    pub is_attending: bool,
    /// Receive push notifications for chat messages
    #[serde(default = "default_true")]
    pub notify_chat: bool,
    /// Receive push notifications for game list changes
    #[serde(default = "default_true")]
    pub notify_games: bool,
    /// Receive push notifications for cabin list changes
    #[serde(default = "default_true")]
    pub notify_accommodations: bool,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    /// Build a fresh non-admin record with default notification settings.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            is_admin: false,
            is_attending: false,
            notify_chat: true,
            notify_games: true,
            notify_accommodations: true,
            created_at: Utc::now(),
        }
    }
}

/// Repository for user records.
pub struct UserRepository<'a> {
    store: &'a DataStore,
}

impl<'a> UserRepository<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Check if a user record exists.
    pub fn exists(&self, user_id: &str) -> bool {
        self.store.exists(self.store.paths().user(user_id))
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: &str) -> StorageResult<StoredUser> {
        let path = self.store.paths().user(user_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.store.read_json(path)
    }

    /// Look a user up by username (exact match).
    pub fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        for user in self.list_all()? {
            if user.username == username {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    /// Look a user up by email (exact match).
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<StoredUser>> {
        for user in self.list_all()? {
            if user.email == email {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    /// Create a new user record. The caller is responsible for uniqueness
    /// checks before calling; this only guards against ID collisions.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        if self.exists(&user.id) {
            return Err(StorageError::AlreadyExists(format!("User {}", user.id)));
        }
        self.store.write_json(self.store.paths().user(&user.id), user)
    }

    /// Update an existing user record.
    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        if !self.exists(&user.id) {
            return Err(StorageError::NotFound(format!("User {}", user.id)));
        }
        self.store.write_json(self.store.paths().user(&user.id), user)
    }

    /// Delete a user record.
    pub fn delete(&self, user_id: &str) -> StorageResult<()> {
        if !self.exists(user_id) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.store.delete(self.store.paths().user(user_id))
    }

    /// List all user records.
    pub fn list_all(&self) -> StorageResult<Vec<StoredUser>> {
        let ids = self
            .store
            .list_files(self.store.paths().users_dir(), "json")?;

        let mut users = Vec::new();
        for id in ids {
            if let Ok(user) = self.get(&id) {
                users.push(user);
            }
        }
        Ok(users)
    }

    /// Total number of registered users.
    pub fn count(&self) -> StorageResult<usize> {
        Ok(self
            .store
            .list_files(self.store.paths().users_dir(), "json")?
            .len())
    }
}
