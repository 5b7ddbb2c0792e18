// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! # Storage Module
//!
//! Persistent storage for the coordination service: one JSON document per
//! entity under the data directory, written atomically via rename.
//!
//! ## Storage Layout
//!
//! ```text
//! data/
//!   event.json            # Singleton event record
//!   users/{id}.json
//!   cabins/{id}.json      # Vote set embedded in the document
//!   games/{id}.json       # Vote set embedded in the document
//!   messages/{id}.json
//!   subscriptions/{id}.json
//! ```

pub mod paths;
pub mod repository;
pub mod store;

pub use paths::StoragePaths;
pub use repository::{
    CabinChanges, CabinRepository, EventChanges, EventRepository, GameRepository,
    MessageRepository, StoredCabin, StoredEvent, StoredGame, StoredMessage, StoredSubscription,
    StoredUser, SubscriptionRepository, UserRepository, MAX_MESSAGE_LEN,
};
pub use store::{DataStore, StorageError, StorageResult};
