// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Chat wall message repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{DataStore, StorageError, StorageResult};

/// Maximum message length in characters.
pub const MAX_MESSAGE_LEN: usize = 1024;

/// Chat wall message document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredMessage {
    /// Unique message identifier (UUID)
    pub id: String,
    /// Author's user ID
    pub user_id: String,
    /// Message text, trimmed, at most [`MAX_MESSAGE_LEN`] characters
    pub content: String,
    /// When the message was posted
    pub created_at: DateTime<Utc>,
    /// When the message was last edited
    pub updated_at: DateTime<Utc>,
}

impl StoredMessage {
    pub fn new(user_id: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository for chat wall messages.
pub struct MessageRepository<'a> {
    store: &'a DataStore,
}

impl<'a> MessageRepository<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    pub fn exists(&self, message_id: &str) -> bool {
        self.store.exists(self.store.paths().message(message_id))
    }

    pub fn get(&self, message_id: &str) -> StorageResult<StoredMessage> {
        let path = self.store.paths().message(message_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("Message {message_id}")));
        }
        self.store.read_json(path)
    }

    pub fn create(&self, message: &StoredMessage) -> StorageResult<()> {
        if self.exists(&message.id) {
            return Err(StorageError::AlreadyExists(format!(
                "Message {}",
                message.id
            )));
        }
        self.store
            .write_json(self.store.paths().message(&message.id), message)
    }

    /// Replace the content and bump `updated_at`.
    pub fn edit(&self, message_id: &str, content: String) -> StorageResult<StoredMessage> {
        let mut message = self.get(message_id)?;
        message.content = content;
        message.updated_at = Utc::now();
        self.store
            .write_json(self.store.paths().message(message_id), &message)?;
        Ok(message)
    }

    pub fn delete(&self, message_id: &str) -> StorageResult<()> {
        if !self.exists(message_id) {
            return Err(StorageError::NotFound(format!("Message {message_id}")));
        }
        self.store.delete(self.store.paths().message(message_id))
    }

    /// List messages oldest-first, capped at `limit`.
    pub fn list_chronological(&self, limit: usize) -> StorageResult<Vec<StoredMessage>> {
        let ids = self
            .store
            .list_files(self.store.paths().messages_dir(), "json")?;

        let mut messages = Vec::new();
        for id in ids {
            if let Ok(message) = self.get(&id) {
                messages.push(message);
            }
        }
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        messages.truncate(limit);
        Ok(messages)
    }

    /// Delete every message by the given user (used when deleting a user).
    pub fn delete_for_user(&self, user_id: &str) -> StorageResult<()> {
        let ids = self
            .store
            .list_files(self.store.paths().messages_dir(), "json")?;

        for id in ids {
            if let Ok(message) = self.get(&id) {
                if message.user_id == user_id {
                    self.delete(&message.id)?;
                }
            }
        }
        Ok(())
    }
}
