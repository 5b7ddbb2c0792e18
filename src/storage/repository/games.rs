// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Game repository.
//!
//! Games work like cabins (embedded vote set) with two differences: any
//! user may add one, and the name is unique case-insensitively.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{DataStore, StorageError, StorageResult};

/// Game document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredGame {
    /// Unique game identifier (UUID)
    pub id: String,
    /// Display name, unique case-insensitively
    pub name: String,
    /// User ID of whoever suggested the game
    pub created_by: String,
    /// When the game was suggested
    pub created_at: DateTime<Utc>,
    /// IDs of users who voted for this game
    #[serde(default)]
    pub votes: BTreeSet<String>,
}

impl StoredGame {
    pub fn new(name: String, created_by: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            created_by,
            created_at: Utc::now(),
            votes: BTreeSet::new(),
        }
    }
}

/// Repository for game documents.
pub struct GameRepository<'a> {
    store: &'a DataStore,
}

impl<'a> GameRepository<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    pub fn exists(&self, game_id: &str) -> bool {
        self.store.exists(self.store.paths().game(game_id))
    }

    pub fn get(&self, game_id: &str) -> StorageResult<StoredGame> {
        let path = self.store.paths().game(game_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("Game {game_id}")));
        }
        self.store.read_json(path)
    }

    /// Case-insensitive name lookup.
    pub fn find_by_name(&self, name: &str) -> StorageResult<Option<StoredGame>> {
        let needle = name.to_lowercase();
        for game in self.list_all()? {
            if game.name.to_lowercase() == needle {
                return Ok(Some(game));
            }
        }
        Ok(None)
    }

    pub fn create(&self, game: &StoredGame) -> StorageResult<()> {
        if self.exists(&game.id) {
            return Err(StorageError::AlreadyExists(format!("Game {}", game.id)));
        }
        self.store.write_json(self.store.paths().game(&game.id), game)
    }

    pub fn update(&self, game: &StoredGame) -> StorageResult<()> {
        if !self.exists(&game.id) {
            return Err(StorageError::NotFound(format!("Game {}", game.id)));
        }
        self.store.write_json(self.store.paths().game(&game.id), game)
    }

    pub fn delete(&self, game_id: &str) -> StorageResult<()> {
        if !self.exists(game_id) {
            return Err(StorageError::NotFound(format!("Game {game_id}")));
        }
        self.store.delete(self.store.paths().game(game_id))
    }

    pub fn list_all(&self) -> StorageResult<Vec<StoredGame>> {
        let ids = self
            .store
            .list_files(self.store.paths().games_dir(), "json")?;

        let mut games = Vec::new();
        for id in ids {
            if let Ok(game) = self.get(&id) {
                games.push(game);
            }
        }
        Ok(games)
    }

    /// Set or clear a user's vote. Returns the updated vote count.
    pub fn set_vote(&self, game_id: &str, user_id: &str, vote: bool) -> StorageResult<usize> {
        let mut game = self.get(game_id)?;

        if vote {
            game.votes.insert(user_id.to_string());
        } else {
            game.votes.remove(user_id);
        }

        self.update(&game)?;
        Ok(game.votes.len())
    }

    /// Remove a user's votes from every game (used when deleting a user).
    pub fn remove_votes_for_user(&self, user_id: &str) -> StorageResult<()> {
        for mut game in self.list_all()? {
            if game.votes.remove(user_id) {
                self.update(&game)?;
            }
        }
        Ok(())
    }
}
