// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! Successful responses carry `success: true` plus a payload; error
//! responses (see `error.rs`) carry `success: false` and an `error`
//! string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::{StoredCabin, StoredGame, StoredMessage, StoredUser};

// =============================================================================
// Shared envelope
// =============================================================================

/// Generic acknowledgement with a human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

impl AckResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// =============================================================================
// Users & Authentication
// =============================================================================

/// Public view of a user account (never includes the password hash).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub is_attending: bool,
}

impl From<&StoredUser> for UserProfile {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            is_attending: user.is_attending,
        }
    }
}

/// Request to create an account.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Desired login name (3–50 characters)
    pub username: String,
    /// Contact address
    pub email: String,
    /// Password (at least 6 characters)
    pub password: String,
    /// Shared event registration password
    pub registration_password: String,
}

/// Request to log in.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful registration or login: profile plus bearer token.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: UserProfile,
    pub token: String,
}

/// Fresh profile data for an authenticated request.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: UserProfile,
}

/// Sparse profile update. Absent fields are left unchanged; a password
/// change requires the current password.
#[derive(Debug, Clone, Deserialize, Default, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub is_attending: Option<bool>,
}

// =============================================================================
// Event
// =============================================================================

/// Event record as shown to participants. The registration password is
/// deliberately absent.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventInfo {
    pub title: String,
    pub event_date: Option<DateTime<Utc>>,
    pub event_end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub max_participants: Option<u32>,
    /// Number of registered accounts
    pub registered_participants: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    pub success: bool,
    pub event: EventInfo,
}

/// Sparse event update (admin only).
#[derive(Debug, Clone, Deserialize, Default, ToSchema)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub event_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub registration_password: Option<String>,
}

// =============================================================================
// Cabins
// =============================================================================

/// Cabin with aggregated vote information for the requesting user.
#[derive(Debug, Serialize, ToSchema)]
pub struct CabinView {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub vote_count: usize,
    /// Whether the requesting user voted for this cabin
    pub user_voted: bool,
}

impl CabinView {
    pub fn from_stored(cabin: &StoredCabin, viewer_id: &str) -> Self {
        Self {
            id: cabin.id.clone(),
            name: cabin.name.clone(),
            url: cabin.url.clone(),
            image_url: cabin.image_url.clone(),
            description: cabin.description.clone(),
            created_at: cabin.created_at,
            vote_count: cabin.votes.len(),
            user_voted: cabin.votes.contains(viewer_id),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CabinListResponse {
    pub success: bool,
    pub cabins: Vec<CabinView>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCabinRequest {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Sparse cabin update (admin only).
#[derive(Debug, Clone, Deserialize, Default, ToSchema)]
pub struct UpdateCabinRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CabinCreatedResponse {
    pub success: bool,
    pub message: String,
    pub cabin: CabinView,
}

// =============================================================================
// Games
// =============================================================================

/// Game with aggregated vote information for the requesting user.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameView {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Username of whoever suggested the game, if the account still exists
    pub created_by_username: Option<String>,
    pub vote_count: usize,
    pub user_voted: bool,
}

impl GameView {
    pub fn from_stored(
        game: &StoredGame,
        viewer_id: &str,
        created_by_username: Option<String>,
    ) -> Self {
        Self {
            id: game.id.clone(),
            name: game.name.clone(),
            created_at: game.created_at,
            created_by_username,
            vote_count: game.votes.len(),
            user_voted: game.votes.contains(viewer_id),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GameListResponse {
    pub success: bool,
    pub games: Vec<GameView>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddGameRequest {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GameCreatedResponse {
    pub success: bool,
    pub message: String,
    pub game: GameView,
}

// =============================================================================
// Voting
// =============================================================================

/// Vote toggle request: `vote: true` casts, `vote: false` retracts.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CabinVoteRequest {
    pub cabin_id: String,
    pub vote: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GameVoteRequest {
    pub game_id: String,
    pub vote: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VoteResponse {
    pub success: bool,
    pub message: String,
    pub vote_count: usize,
}

// =============================================================================
// Messages
// =============================================================================

/// Chat wall message joined with its author.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageView {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: String,
    /// Author username, if the account still exists
    pub username: Option<String>,
    pub is_admin: bool,
}

impl MessageView {
    pub fn from_stored(message: &StoredMessage, author: Option<&StoredUser>) -> Self {
        Self {
            id: message.id.clone(),
            content: message.content.clone(),
            created_at: message.created_at,
            updated_at: message.updated_at,
            user_id: message.user_id.clone(),
            username: author.map(|u| u.username.clone()),
            is_admin: author.map(|u| u.is_admin).unwrap_or(false),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageListResponse {
    pub success: bool,
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PostMessageRequest {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EditMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessagePostedResponse {
    pub success: bool,
    pub message: MessageView,
}

// =============================================================================
// Admin
// =============================================================================

/// Admin view of a user account.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminUserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub is_attending: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&StoredUser> for AdminUserView {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            is_attending: user.is_attending,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminUserListResponse {
    pub success: bool,
    pub users: Vec<AdminUserView>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetAdminRequest {
    pub is_admin: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// =============================================================================
// Notifications
// =============================================================================

/// Browser push subscription as delivered by the Push API.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: PushKeys,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubscribeRequest {
    pub subscription: PushSubscription,
}

#[derive(Debug, Clone, Deserialize, Default, ToSchema)]
pub struct UnsubscribeRequest {
    /// Restrict removal to one endpoint; absent removes all of the
    /// caller's subscriptions.
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicKeyResponse {
    pub success: bool,
    pub public_key: String,
}

/// Per-category notification opt-ins.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationPreferences {
    pub chat: bool,
    pub games: bool,
    pub accommodations: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PreferencesResponse {
    pub success: bool,
    pub preferences: NotificationPreferences,
}

/// Sparse preference update.
#[derive(Debug, Clone, Deserialize, Default, ToSchema)]
pub struct UpdatePreferencesRequest {
    #[serde(default)]
    pub chat: Option<bool>,
    #[serde(default)]
    pub games: Option<bool>,
    #[serde(default)]
    pub accommodations: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> StoredUser {
        StoredUser::new(
            "alice".into(),
            "alice@example.com".into(),
            "$argon2id$stub".into(),
        )
    }

    #[test]
    fn user_profile_omits_password_hash() {
        let user = sample_user();
        let profile = UserProfile::from(&user);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("alice"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn cabin_view_reflects_viewer_vote() {
        let mut cabin = StoredCabin::new("Hütte".into(), None, None, None, "admin".into());
        cabin.votes.insert("u1".into());
        cabin.votes.insert("u2".into());

        let view = CabinView::from_stored(&cabin, "u1");
        assert_eq!(view.vote_count, 2);
        assert!(view.user_voted);

        let view = CabinView::from_stored(&cabin, "u3");
        assert!(!view.user_voted);
    }

    #[test]
    fn message_view_survives_deleted_author() {
        let message = StoredMessage::new("ghost".into(), "hello".into());
        let view = MessageView::from_stored(&message, None);
        assert_eq!(view.username, None);
        assert!(!view.is_admin);
    }

    #[test]
    fn sparse_requests_default_to_empty() {
        let update: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        assert!(update.email.is_none());
        assert!(update.new_password.is_none());

        let update: UpdateEventRequest = serde_json::from_str(r#"{"title":"LAN"}"#).unwrap();
        assert_eq!(update.title.as_deref(), Some("LAN"));
        assert!(update.location.is_none());
    }
}
