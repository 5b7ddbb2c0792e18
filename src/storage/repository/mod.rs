// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Repository layer providing typed access to the data directory.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the DataStore for all file operations.

pub mod cabins;
pub mod event;
pub mod games;
pub mod messages;
pub mod subscriptions;
pub mod users;

pub use cabins::{CabinChanges, CabinRepository, StoredCabin};
pub use event::{EventChanges, EventRepository, StoredEvent};
pub use games::{GameRepository, StoredGame};
pub use messages::{MessageRepository, StoredMessage, MAX_MESSAGE_LEN};
pub use subscriptions::{StoredSubscription, SubscriptionRepository};
pub use users::{StoredUser, UserRepository};
