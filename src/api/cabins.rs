// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Cabin endpoints: the accommodation candidates and their votes.
//! Listing and voting are open to every participant; the catalog itself
//! is managed by admins.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{AdminOnly, Auth},
    error::ApiError,
    models::{
        AckResponse, CabinCreatedResponse, CabinListResponse, CabinView, CabinVoteRequest,
        CreateCabinRequest, UpdateCabinRequest, VoteResponse,
    },
    state::AppState,
    storage::{CabinChanges, CabinRepository, StorageError, StoredCabin},
};

/// List all cabins with vote counts, most popular first.
#[utoipa::path(
    get,
    path = "/v1/cabins",
    tag = "Cabins",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cabin list", body = CabinListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_cabins(
    Auth(claims): Auth,
    State(state): State<AppState>,
) -> Result<Json<CabinListResponse>, ApiError> {
    let mut cabins = CabinRepository::new(&state.store).list_all()?;
    cabins.sort_by(|a, b| {
        b.votes
            .len()
            .cmp(&a.votes.len())
            .then(b.created_at.cmp(&a.created_at))
    });

    let views = cabins
        .iter()
        .map(|cabin| CabinView::from_stored(cabin, &claims.sub))
        .collect();

    Ok(Json(CabinListResponse {
        success: true,
        cabins: views,
    }))
}

/// Cast or retract a vote for a cabin.
#[utoipa::path(
    post,
    path = "/v1/cabins/vote",
    request_body = CabinVoteRequest,
    tag = "Cabins",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Vote recorded", body = VoteResponse),
        (status = 400, description = "Missing cabin ID"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Cabin not found")
    )
)]
pub async fn vote_cabin(
    Auth(claims): Auth,
    State(state): State<AppState>,
    Json(request): Json<CabinVoteRequest>,
) -> Result<Json<VoteResponse>, ApiError> {
    if request.cabin_id.is_empty() {
        return Err(ApiError::bad_request("Cabin ID required"));
    }

    let vote_count = CabinRepository::new(&state.store)
        .set_vote(&request.cabin_id, &claims.sub, request.vote)
        .map_err(|e| match e {
            StorageError::NotFound(_) => ApiError::not_found("Cabin not found"),
            other => other.into(),
        })?;

    Ok(Json(VoteResponse {
        success: true,
        message: if request.vote {
            "Vote added".to_string()
        } else {
            "Vote removed".to_string()
        },
        vote_count,
    }))
}

/// Add a cabin to the catalog (admin only).
#[utoipa::path(
    post,
    path = "/v1/cabins",
    request_body = CreateCabinRequest,
    tag = "Cabins",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Cabin created", body = CabinCreatedResponse),
        (status = 400, description = "Name missing"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn create_cabin(
    AdminOnly(claims): AdminOnly,
    State(state): State<AppState>,
    Json(request): Json<CreateCabinRequest>,
) -> Result<(StatusCode, Json<CabinCreatedResponse>), ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }

    let cabin = StoredCabin::new(
        name.to_string(),
        request.url,
        request.image_url,
        request.description,
        claims.sub.clone(),
    );
    CabinRepository::new(&state.store).create(&cabin)?;

    tracing::info!(cabin_id = %cabin.id, admin = %claims.username, "cabin added");

    Ok((
        StatusCode::CREATED,
        Json(CabinCreatedResponse {
            success: true,
            message: "Cabin added".to_string(),
            cabin: CabinView::from_stored(&cabin, &claims.sub),
        }),
    ))
}

/// Update a cabin (admin only). Only the supplied fields change.
#[utoipa::path(
    put,
    path = "/v1/cabins/{cabin_id}",
    params(("cabin_id" = String, Path, description = "Cabin to update")),
    request_body = UpdateCabinRequest,
    tag = "Cabins",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cabin updated", body = AckResponse),
        (status = 400, description = "No changes supplied"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Cabin not found")
    )
)]
pub async fn update_cabin(
    AdminOnly(_claims): AdminOnly,
    Path(cabin_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UpdateCabinRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let changes = CabinChanges {
        name: request.name,
        url: request.url,
        image_url: request.image_url,
        description: request.description,
    };

    if changes.is_empty() {
        return Err(ApiError::bad_request("No changes supplied"));
    }

    CabinRepository::new(&state.store)
        .apply(&cabin_id, changes)
        .map_err(|e| match e {
            StorageError::NotFound(_) => ApiError::not_found("Cabin not found"),
            other => other.into(),
        })?;

    Ok(Json(AckResponse::ok("Cabin updated")))
}

/// Remove a cabin and its votes (admin only).
#[utoipa::path(
    delete,
    path = "/v1/cabins/{cabin_id}",
    params(("cabin_id" = String, Path, description = "Cabin to delete")),
    tag = "Cabins",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cabin deleted", body = AckResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Cabin not found")
    )
)]
pub async fn delete_cabin(
    AdminOnly(claims): AdminOnly,
    Path(cabin_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AckResponse>, ApiError> {
    CabinRepository::new(&state.store)
        .delete(&cabin_id)
        .map_err(|e| match e {
            StorageError::NotFound(_) => ApiError::not_found("Cabin not found"),
            other => other.into(),
        })?;

    tracing::info!(cabin_id = %cabin_id, admin = %claims.username, "cabin deleted");

    Ok(Json(AckResponse::ok("Cabin deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Claims, TokenService};
    use crate::config::AppConfig;
    use crate::storage::{DataStore, StoragePaths};
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let mut store = DataStore::new(StoragePaths::new(dir.path()));
        store.initialize().expect("initialize");

        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            host: "127.0.0.1".into(),
            port: 0,
            token_secret: "test-secret".into(),
            token_ttl_secs: None,
            vapid_public_key: None,
        };
        let tokens = TokenService::new(config.token_secret.as_bytes());
        (AppState::new(store, tokens, config), dir)
    }

    fn user_claims(sub: &str) -> Claims {
        Claims {
            sub: sub.into(),
            username: format!("user-{sub}"),
            is_admin: false,
            iat: 0,
            exp: None,
        }
    }

    fn admin_claims() -> Claims {
        Claims {
            sub: "admin-1".into(),
            username: "admin".into(),
            is_admin: true,
            iat: 0,
            exp: None,
        }
    }

    async fn add_cabin(state: &AppState, name: &str) -> CabinView {
        let (_, Json(response)) = create_cabin(
            AdminOnly(admin_claims()),
            State(state.clone()),
            Json(CreateCabinRequest {
                name: name.into(),
                url: None,
                image_url: None,
                description: None,
            }),
        )
        .await
        .expect("cabin created");
        response.cabin
    }

    #[tokio::test]
    async fn create_vote_and_list_flow() {
        let (state, _dir) = test_state();

        let cabin = add_cabin(&state, "Hütte Nord").await;

        let Json(vote) = vote_cabin(
            Auth(user_claims("u1")),
            State(state.clone()),
            Json(CabinVoteRequest {
                cabin_id: cabin.id.clone(),
                vote: true,
            }),
        )
        .await
        .expect("vote succeeds");
        assert_eq!(vote.vote_count, 1);

        let Json(listing) = list_cabins(Auth(user_claims("u1")), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(listing.cabins.len(), 1);
        assert!(listing.cabins[0].user_voted);

        // Another viewer sees the count but no own vote.
        let Json(listing) = list_cabins(Auth(user_claims("u2")), State(state))
            .await
            .unwrap();
        assert_eq!(listing.cabins[0].vote_count, 1);
        assert!(!listing.cabins[0].user_voted);
    }

    #[tokio::test]
    async fn list_sorts_by_votes_descending() {
        let (state, _dir) = test_state();

        let quiet = add_cabin(&state, "Quiet").await;
        let popular = add_cabin(&state, "Popular").await;

        for user in ["u1", "u2"] {
            vote_cabin(
                Auth(user_claims(user)),
                State(state.clone()),
                Json(CabinVoteRequest {
                    cabin_id: popular.id.clone(),
                    vote: true,
                }),
            )
            .await
            .unwrap();
        }
        vote_cabin(
            Auth(user_claims("u1")),
            State(state.clone()),
            Json(CabinVoteRequest {
                cabin_id: quiet.id.clone(),
                vote: true,
            }),
        )
        .await
        .unwrap();

        let Json(listing) = list_cabins(Auth(user_claims("u1")), State(state))
            .await
            .unwrap();
        assert_eq!(listing.cabins[0].name, "Popular");
        assert_eq!(listing.cabins[1].name, "Quiet");
    }

    #[tokio::test]
    async fn vote_on_unknown_cabin_is_404() {
        let (state, _dir) = test_state();

        let err = vote_cabin(
            Auth(user_claims("u1")),
            State(state),
            Json(CabinVoteRequest {
                cabin_id: "missing".into(),
                vote: true,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_requires_name() {
        let (state, _dir) = test_state();

        let err = create_cabin(
            AdminOnly(admin_claims()),
            State(state),
            Json(CreateCabinRequest {
                name: "   ".into(),
                url: None,
                image_url: None,
                description: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_and_delete_round_trip() {
        let (state, _dir) = test_state();

        let cabin = add_cabin(&state, "Hütte Süd").await;

        update_cabin(
            AdminOnly(admin_claims()),
            Path(cabin.id.clone()),
            State(state.clone()),
            Json(UpdateCabinRequest {
                description: Some("Mit Sauna".into()),
                ..Default::default()
            }),
        )
        .await
        .expect("update succeeds");

        let err = update_cabin(
            AdminOnly(admin_claims()),
            Path(cabin.id.clone()),
            State(state.clone()),
            Json(UpdateCabinRequest::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        delete_cabin(
            AdminOnly(admin_claims()),
            Path(cabin.id.clone()),
            State(state.clone()),
        )
        .await
        .expect("delete succeeds");

        let err = delete_cabin(AdminOnly(admin_claims()), Path(cabin.id), State(state))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
