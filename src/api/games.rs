// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Game endpoints. Anyone can suggest a game and votes for it
//! automatically; only admins can remove one.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{AdminOnly, Auth},
    error::ApiError,
    models::{
        AckResponse, AddGameRequest, GameCreatedResponse, GameListResponse, GameView,
        GameVoteRequest, VoteResponse,
    },
    state::AppState,
    storage::{GameRepository, StorageError, StoredGame, UserRepository},
};

/// List all games with vote counts, most popular first; ties keep the
/// older suggestion on top.
#[utoipa::path(
    get,
    path = "/v1/games",
    tag = "Games",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Game list", body = GameListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_games(
    Auth(claims): Auth,
    State(state): State<AppState>,
) -> Result<Json<GameListResponse>, ApiError> {
    let mut games = GameRepository::new(&state.store).list_all()?;
    games.sort_by(|a, b| {
        b.votes
            .len()
            .cmp(&a.votes.len())
            .then(a.created_at.cmp(&b.created_at))
    });

    let usernames: HashMap<String, String> = UserRepository::new(&state.store)
        .list_all()?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    let views = games
        .iter()
        .map(|game| {
            let creator = usernames.get(&game.created_by).cloned();
            GameView::from_stored(game, &claims.sub, creator)
        })
        .collect();

    Ok(Json(GameListResponse {
        success: true,
        games: views,
    }))
}

/// Suggest a game. The name is unique case-insensitively and the
/// suggester's vote is cast automatically.
#[utoipa::path(
    post,
    path = "/v1/games",
    request_body = AddGameRequest,
    tag = "Games",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Game added", body = GameCreatedResponse),
        (status = 400, description = "Name missing"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Game already exists")
    )
)]
pub async fn add_game(
    Auth(claims): Auth,
    State(state): State<AppState>,
    Json(request): Json<AddGameRequest>,
) -> Result<(StatusCode, Json<GameCreatedResponse>), ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Game name is required"));
    }

    let games = GameRepository::new(&state.store);
    if games.find_by_name(name)?.is_some() {
        return Err(ApiError::conflict("This game already exists"));
    }

    let game = StoredGame::new(name.to_string(), claims.sub.clone());
    games.create(&game)?;
    games.set_vote(&game.id, &claims.sub, true)?;

    tracing::info!(game_id = %game.id, user = %claims.username, "game suggested");

    let stored = games.get(&game.id)?;
    Ok((
        StatusCode::CREATED,
        Json(GameCreatedResponse {
            success: true,
            message: "Game added".to_string(),
            game: GameView::from_stored(&stored, &claims.sub, Some(claims.username.clone())),
        }),
    ))
}

/// Cast or retract a vote for a game.
#[utoipa::path(
    post,
    path = "/v1/games/vote",
    request_body = GameVoteRequest,
    tag = "Games",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Vote recorded", body = VoteResponse),
        (status = 400, description = "Missing game ID"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Game not found")
    )
)]
pub async fn vote_game(
    Auth(claims): Auth,
    State(state): State<AppState>,
    Json(request): Json<GameVoteRequest>,
) -> Result<Json<VoteResponse>, ApiError> {
    if request.game_id.is_empty() {
        return Err(ApiError::bad_request("Game ID required"));
    }

    let vote_count = GameRepository::new(&state.store)
        .set_vote(&request.game_id, &claims.sub, request.vote)
        .map_err(|e| match e {
            StorageError::NotFound(_) => ApiError::not_found("Game not found"),
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

/// Remove a game and its votes (admin only).
#[utoipa::path(
    delete,
    path = "/v1/games/{game_id}",
    params(("game_id" = String, Path, description = "Game to delete")),
    tag = "Games",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Game deleted", body = AckResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Game not found")
    )
)]
pub async fn delete_game(
    AdminOnly(claims): AdminOnly,
    Path(game_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AckResponse>, ApiError> {
    let games = GameRepository::new(&state.store);
    let game = games
        .get(&game_id)
        .map_err(|_| ApiError::not_found("Game not found"))?;

    games.delete(&game.id)?;

    tracing::info!(game_id = %game.id, admin = %claims.username, "game deleted");

    Ok(Json(AckResponse::ok(format!(
        "Game \"{}\" deleted",
        game.name
    ))))
}
