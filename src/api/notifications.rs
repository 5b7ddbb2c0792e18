// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Push notification bookkeeping: subscription storage and per-category
//! preferences. Actually delivering notifications is an out-of-band
//! sender's job; this service only keeps the records it needs.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        AckResponse, NotificationPreferences, PreferencesResponse, PublicKeyResponse,
        SubscribeRequest, UnsubscribeRequest, UpdatePreferencesRequest,
    },
    state::AppState,
    storage::{SubscriptionRepository, UserRepository},
};

/// Get the server's public VAPID key for the browser's Push API.
#[utoipa::path(
    get,
    path = "/v1/notifications/public-key",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Public key", body = PublicKeyResponse),
        (status = 401, description = "Not authenticated"),
        (status = 503, description = "Push notifications not configured")
    )
)]
pub async fn public_key(
    Auth(_claims): Auth,
    State(state): State<AppState>,
) -> Result<Json<PublicKeyResponse>, ApiError> {
    let Some(key) = state.config.vapid_public_key.clone() else {
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Push notifications are not configured",
        ));
    };

    Ok(Json(PublicKeyResponse {
        success: true,
        public_key: key,
    }))
}

/// Store (or refresh) the caller's push subscription.
#[utoipa::path(
    post,
    path = "/v1/notifications/subscribe",
    request_body = SubscribeRequest,
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Subscription stored", body = AckResponse),
        (status = 400, description = "Invalid subscription"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn subscribe(
    Auth(claims): Auth,
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let subscription = request.subscription;
    if subscription.endpoint.is_empty() {
        return Err(ApiError::bad_request("Invalid subscription"));
    }

    SubscriptionRepository::new(&state.store).upsert(
        &claims.sub,
        &subscription.endpoint,
        &subscription.keys.p256dh,
        &subscription.keys.auth,
    )?;

    Ok(Json(AckResponse::ok("Notifications enabled")))
}

/// Remove the caller's push subscriptions (optionally only one endpoint).
#[utoipa::path(
    post,
    path = "/v1/notifications/unsubscribe",
    request_body = UnsubscribeRequest,
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Subscriptions removed", body = AckResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn unsubscribe(
    Auth(claims): Auth,
    State(state): State<AppState>,
    Json(request): Json<UnsubscribeRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    SubscriptionRepository::new(&state.store)
        .delete_for_user(&claims.sub, request.endpoint.as_deref())?;

    Ok(Json(AckResponse::ok("Notifications disabled")))
}

/// Get the caller's notification preferences.
#[utoipa::path(
    get,
    path = "/v1/notifications/preferences",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Preferences", body = PreferencesResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn get_preferences(
    Auth(claims): Auth,
    State(state): State<AppState>,
) -> Result<Json<PreferencesResponse>, ApiError> {
    let user = UserRepository::new(&state.store)
        .get(&claims.sub)
        .map_err(|_| ApiError::not_found("User not found"))?;

    Ok(Json(PreferencesResponse {
        success: true,
        preferences: NotificationPreferences {
            chat: user.notify_chat,
            games: user.notify_games,
            accommodations: user.notify_accommodations,
        },
    }))
}

/// Update the caller's notification preferences. Only the supplied
/// toggles change.
#[utoipa::path(
    put,
    path = "/v1/notifications/preferences",
    request_body = UpdatePreferencesRequest,
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Preferences updated", body = PreferencesResponse),
        (status = 400, description = "No settings supplied"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn update_preferences(
    Auth(claims): Auth,
    State(state): State<AppState>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> Result<Json<PreferencesResponse>, ApiError> {
    if request.chat.is_none() && request.games.is_none() && request.accommodations.is_none() {
        return Err(ApiError::bad_request("No settings supplied"));
    }

    let users = UserRepository::new(&state.store);
    let mut user = users
        .get(&claims.sub)
        .map_err(|_| ApiError::not_found("User not found"))?;

    if let Some(chat) = request.chat {
        user.notify_chat = chat;
    }
    if let Some(games) = request.games {
        user.notify_games = games;
    }
    if let Some(accommodations) = request.accommodations {
        user.notify_accommodations = accommodations;
    }
    users.update(&user)?;

    Ok(Json(PreferencesResponse {
        success: true,
        preferences: NotificationPreferences {
            chat: user.notify_chat,
            games: user.notify_games,
            accommodations: user.notify_accommodations,
        },
    }))
}
