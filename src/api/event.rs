// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Event endpoints: the single event record everyone is organizing around.

use axum::{extract::State, Json};

use crate::{
    auth::{AdminOnly, Auth},
    error::ApiError,
    models::{AckResponse, EventInfo, EventResponse, UpdateEventRequest},
    state::AppState,
    storage::{EventChanges, EventRepository, UserRepository},
};

/// Get the event record with the current participant count.
#[utoipa::path(
    get,
    path = "/v1/event",
    tag = "Event",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event data", body = EventResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No event configured")
    )
)]
pub async fn get_event(
    Auth(_claims): Auth,
    State(state): State<AppState>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = EventRepository::new(&state.store)
        .get()
        .map_err(|_| ApiError::not_found("Event data not found"))?;

    let registered = UserRepository::new(&state.store).count()?;

    Ok(Json(EventResponse {
        success: true,
        event: EventInfo {
            title: event.title,
            event_date: event.event_date,
            event_end_date: event.event_end_date,
            location: event.location,
            max_participants: event.max_participants,
            registered_participants: registered,
        },
    }))
}

/// Update the event record (admin only). Only the supplied fields change.
#[utoipa::path(
    put,
    path = "/v1/event",
    request_body = UpdateEventRequest,
    tag = "Event",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event updated", body = AckResponse),
        (status = 400, description = "No changes supplied"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "No event configured")
    )
)]
pub async fn update_event(
    AdminOnly(claims): AdminOnly,
    State(state): State<AppState>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let changes = EventChanges {
        title: request.title,
        event_date: request.event_date,
        event_end_date: request.event_end_date,
        location: request.location,
        max_participants: request.max_participants,
        registration_password: request.registration_password,
    };

    if changes.is_empty() {
        return Err(ApiError::bad_request("No changes supplied"));
    }

    EventRepository::new(&state.store)
        .apply(changes)
        .map_err(|_| ApiError::not_found("Event data not found"))?;

    tracing::info!(admin = %claims.username, "event record updated");

    Ok(Json(AckResponse::ok("Event updated")))
}
