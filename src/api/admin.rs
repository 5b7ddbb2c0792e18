// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Admin-only user management endpoints.
//!
//! Deleting a user cascades: their messages, votes and push
//! subscriptions go with the account. Admins cannot delete themselves or
//! drop their own admin flag, so there is always a way back in.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::AdminOnly,
    error::ApiError,
    models::{AckResponse, AdminUserListResponse, AdminUserView, ResetPasswordRequest, SetAdminRequest},
    state::AppState,
    storage::{
        CabinRepository, GameRepository, MessageRepository, SubscriptionRepository, UserRepository,
    },
};

const MIN_PASSWORD_LEN: usize = 6;

/// List all user accounts, newest first.
#[utoipa::path(
    get,
    path = "/v1/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = AdminUserListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_users(
    AdminOnly(_claims): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<AdminUserListResponse>, ApiError> {
    let mut users = UserRepository::new(&state.store).list_all()?;
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(AdminUserListResponse {
        success: true,
        users: users.iter().map(AdminUserView::from).collect(),
    }))
}

/// Delete a user account and everything it owns.
#[utoipa::path(
    delete,
    path = "/v1/admin/users/{user_id}",
    params(("user_id" = String, Path, description = "User to delete")),
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User deleted", body = AckResponse),
        (status = 400, description = "Attempted self-deletion"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    AdminOnly(claims): AdminOnly,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AckResponse>, ApiError> {
    if user_id == claims.sub {
        return Err(ApiError::bad_request("You cannot delete yourself"));
    }

    let users = UserRepository::new(&state.store);
    let user = users
        .get(&user_id)
        .map_err(|_| ApiError::not_found("User not found"))?;

    MessageRepository::new(&state.store).delete_for_user(&user.id)?;
    CabinRepository::new(&state.store).remove_votes_for_user(&user.id)?;
    GameRepository::new(&state.store).remove_votes_for_user(&user.id)?;
    SubscriptionRepository::new(&state.store).delete_for_user(&user.id, None)?;
    users.delete(&user.id)?;

    tracing::info!(user_id = %user.id, admin = %claims.username, "user deleted");

    Ok(Json(AckResponse::ok(format!(
        "User \"{}\" deleted",
        user.username
    ))))
}

/// Grant or revoke the admin flag.
///
/// The change takes effect on the target's next login; outstanding
/// tokens keep their issuance-time snapshot.
#[utoipa::path(
    put,
    path = "/v1/admin/users/{user_id}/admin",
    params(("user_id" = String, Path, description = "User to change")),
    request_body = SetAdminRequest,
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Admin flag updated", body = AckResponse),
        (status = 400, description = "Attempted self-demotion"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn set_admin(
    AdminOnly(claims): AdminOnly,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<SetAdminRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    if user_id == claims.sub && !request.is_admin {
        return Err(ApiError::bad_request(
            "You cannot remove your own admin status",
        ));
    }

    let users = UserRepository::new(&state.store);
    let mut user = users
        .get(&user_id)
        .map_err(|_| ApiError::not_found("User not found"))?;

    user.is_admin = request.is_admin;
    users.update(&user)?;

    tracing::info!(
        user_id = %user.id,
        is_admin = request.is_admin,
        admin = %claims.username,
        "admin flag changed"
    );

    Ok(Json(AckResponse::ok("Admin status updated")))
}

/// Reset a user's password.
#[utoipa::path(
    post,
    path = "/v1/admin/users/{user_id}/reset-password",
    params(("user_id" = String, Path, description = "User to reset")),
    request_body = ResetPasswordRequest,
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Password reset", body = AckResponse),
        (status = 400, description = "Password too short"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn reset_password(
    AdminOnly(claims): AdminOnly,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    if request.new_password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }

    let users = UserRepository::new(&state.store);
    let mut user = users
        .get(&user_id)
        .map_err(|_| ApiError::not_found("User not found"))?;

    let hasher = state.hasher.clone();
    let password = request.new_password;
    user.password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|_| ApiError::internal("Internal server error"))??;
    users.update(&user)?;

    tracing::info!(user_id = %user.id, admin = %claims.username, "password reset");

    Ok(Json(AckResponse::ok(format!(
        "Password for user \"{}\" has been reset",
        user.username
    ))))
}
