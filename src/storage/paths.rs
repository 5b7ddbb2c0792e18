// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Path constants and utilities for the data directory layout.

use std::path::{Path, PathBuf};

/// Default base directory for all persistent data.
pub const DATA_ROOT: &str = "./data";

/// Storage path utilities for the data directory.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persistent data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== User Paths ==========

    /// Directory containing all user records.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific user record.
    pub fn user(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    // ========== Event Path ==========

    /// Path to the singleton event document.
    pub fn event(&self) -> PathBuf {
        self.root.join("event.json")
    }

    // ========== Cabin Paths ==========

    /// Directory containing all cabins.
    pub fn cabins_dir(&self) -> PathBuf {
        self.root.join("cabins")
    }

    /// Path to a specific cabin file.
    pub fn cabin(&self, cabin_id: &str) -> PathBuf {
        self.cabins_dir().join(format!("{cabin_id}.json"))
    }

    // ========== Game Paths ==========

    /// Directory containing all games.
    pub fn games_dir(&self) -> PathBuf {
        self.root.join("games")
    }

    /// Path to a specific game file.
    pub fn game(&self, game_id: &str) -> PathBuf {
        self.games_dir().join(format!("{game_id}.json"))
    }

    // ========== Message Paths ==========

    /// Directory containing all chat wall messages.
    pub fn messages_dir(&self) -> PathBuf {
        self.root.join("messages")
    }

    /// Path to a specific message file.
    pub fn message(&self, message_id: &str) -> PathBuf {
        self.messages_dir().join(format!("{message_id}.json"))
    }

    // ========== Push Subscription Paths ==========

    /// Directory containing all push subscriptions.
    pub fn subscriptions_dir(&self) -> PathBuf {
        self.root.join("subscriptions")
    }

    /// Path to a specific push subscription file.
    pub fn subscription(&self, subscription_id: &str) -> PathBuf {
        self.subscriptions_dir()
            .join(format!("{subscription_id}.json"))
    }
}
