// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Chat wall endpoints. Users edit and delete their own messages; admins
//! may moderate any message.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        AckResponse, EditMessageRequest, MessageListResponse, MessagePostedResponse, MessageView,
        PostMessageRequest,
    },
    state::AppState,
    storage::{MessageRepository, StoredMessage, UserRepository, MAX_MESSAGE_LEN},
};

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 500;

#[derive(Debug, Deserialize, IntoParams)]
pub struct MessageListQuery {
    /// Maximum number of messages to return (default 100, capped at 500)
    pub limit: Option<usize>,
}

fn validate_content(content: &str) -> Result<String, ApiError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request("Message must not be empty"));
    }
    if trimmed.chars().count() > MAX_MESSAGE_LEN {
        return Err(ApiError::bad_request("Message too long (max 1024 characters)"));
    }
    Ok(trimmed.to_string())
}

/// List messages in chronological order.
#[utoipa::path(
    get,
    path = "/v1/messages",
    params(MessageListQuery),
    tag = "Messages",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Messages", body = MessageListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_messages(
    Auth(_claims): Auth,
    State(state): State<AppState>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<MessageListResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let messages = MessageRepository::new(&state.store).list_chronological(limit)?;

    let users: HashMap<String, _> = UserRepository::new(&state.store)
        .list_all()?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    let views = messages
        .iter()
        .map(|message| MessageView::from_stored(message, users.get(&message.user_id)))
        .collect();

    Ok(Json(MessageListResponse {
        success: true,
        messages: views,
    }))
}

/// Post a message to the wall.
#[utoipa::path(
    post,
    path = "/v1/messages",
    request_body = PostMessageRequest,
    tag = "Messages",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Message posted", body = MessagePostedResponse),
        (status = 400, description = "Empty or oversized message"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn post_message(
    Auth(claims): Auth,
    State(state): State<AppState>,
    Json(request): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<MessagePostedResponse>), ApiError> {
    let content = validate_content(&request.content)?;

    let message = StoredMessage::new(claims.sub.clone(), content);
    MessageRepository::new(&state.store).create(&message)?;

    let author = UserRepository::new(&state.store).get(&claims.sub).ok();

    Ok((
        StatusCode::CREATED,
        Json(MessagePostedResponse {
            success: true,
            message: MessageView::from_stored(&message, author.as_ref()),
        }),
    ))
}

/// Edit a message. Authors edit their own; admins may edit any.
#[utoipa::path(
    put,
    path = "/v1/messages/{message_id}",
    params(("message_id" = String, Path, description = "Message to edit")),
    request_body = EditMessageRequest,
    tag = "Messages",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Message edited", body = AckResponse),
        (status = 400, description = "Empty or oversized message"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn edit_message(
    Auth(claims): Auth,
    Path(message_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<EditMessageRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let content = validate_content(&request.content)?;

    let messages = MessageRepository::new(&state.store);
    let message = messages
        .get(&message_id)
        .map_err(|_| ApiError::not_found("Message not found"))?;

    if message.user_id != claims.sub && !claims.is_admin {
        return Err(ApiError::forbidden("Not allowed to edit this message"));
    }

    messages.edit(&message.id, content)?;

    Ok(Json(AckResponse::ok("Message edited")))
}

/// Delete a message. Authors delete their own; admins may delete any.
#[utoipa::path(
    delete,
    path = "/v1/messages/{message_id}",
    params(("message_id" = String, Path, description = "Message to delete")),
    tag = "Messages",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Message deleted", body = AckResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn delete_message(
    Auth(claims): Auth,
    Path(message_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AckResponse>, ApiError> {
    let messages = MessageRepository::new(&state.store);
    let message = messages
        .get(&message_id)
        .map_err(|_| ApiError::not_found("Message not found"))?;

    if message.user_id != claims.sub && !claims.is_admin {
        return Err(ApiError::forbidden("Not allowed to delete this message"));
    }

    messages.delete(&message.id)?;

    Ok(Json(AckResponse::ok("Message deleted")))
}
