// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Account endpoints: registration, login, token verification, profile.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, UserProfile,
        VerifyResponse,
    },
    state::AppState,
    storage::{EventRepository, StoredUser, UserRepository},
};

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 50;
const MIN_PASSWORD_LEN: usize = 6;

/// Good-enough mailbox check: something before the `@`, a dot somewhere
/// in the domain, no whitespace.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if email.contains(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

async fn hash_password(state: &AppState, password: String) -> Result<String, ApiError> {
    let hasher = state.hasher.clone();
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|_| ApiError::internal("Internal server error"))??;
    Ok(hash)
}

async fn verify_password(
    state: &AppState,
    password: String,
    stored_hash: String,
) -> Result<bool, ApiError> {
    let hasher = state.hasher.clone();
    let valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
        .await
        .map_err(|_| ApiError::internal("Internal server error"))??;
    Ok(valid)
}

/// Register a new account.
///
/// Requires the shared event registration password. New accounts are
/// never admins; the first admin is promoted out of band.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Wrong registration password"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    if request.username.is_empty()
        || request.email.is_empty()
        || request.password.is_empty()
        || request.registration_password.is_empty()
    {
        return Err(ApiError::bad_request("All fields are required"));
    }

    let username = request.username.trim().to_string();
    if username.len() < MIN_USERNAME_LEN || username.len() > MAX_USERNAME_LEN {
        return Err(ApiError::bad_request(
            "Username must be between 3 and 50 characters",
        ));
    }
    if !is_valid_email(&request.email) {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }

    let event = EventRepository::new(&state.store)
        .get()
        .map_err(|_| ApiError::internal("Event record not found"))?;
    if request.registration_password != event.registration_password {
        return Err(ApiError::unauthorized("Invalid registration password"));
    }

    let users = UserRepository::new(&state.store);
    if users.find_by_username(&username)?.is_some() {
        return Err(ApiError::conflict("Username already taken"));
    }
    if users.find_by_email(&request.email)?.is_some() {
        return Err(ApiError::conflict("Email address already registered"));
    }

    let password_hash = hash_password(&state, request.password).await?;
    let user = StoredUser::new(username, request.email, password_hash);
    users.create(&user)?;

    let token = state
        .tokens
        .issue(&user.id, &user.username, user.is_admin)
        .map_err(|_| ApiError::internal("Failed to issue token"))?;

    tracing::info!(user_id = %user.id, username = %user.username, "account registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "Registration successful".to_string(),
            user: UserProfile::from(&user),
            token,
        }),
    ))
}

/// Log in with username and password.
///
/// An unknown username and a wrong password produce the same response.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let users = UserRepository::new(&state.store);
    let Some(user) = users.find_by_username(&request.username)? else {
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !verify_password(&state, request.password, user.password_hash.clone()).await? {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = state
        .tokens
        .issue(&user.id, &user.username, user.is_admin)
        .map_err(|_| ApiError::internal("Failed to issue token"))?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        user: UserProfile::from(&user),
        token,
    }))
}

/// Verify the presented token and return fresh profile data.
///
/// Unlike the claim snapshot, the returned profile is re-read from the
/// user store, so a promotion or email change shows up here first.
#[utoipa::path(
    get,
    path = "/v1/auth/verify",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token valid", body = VerifyResponse),
        (status = 401, description = "Invalid or missing token"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn verify(
    Auth(claims): Auth,
    State(state): State<AppState>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let user = UserRepository::new(&state.store)
        .get(&claims.sub)
        .map_err(|_| ApiError::not_found("User not found"))?;

    Ok(Json(VerifyResponse {
        success: true,
        user: UserProfile::from(&user),
    }))
}

/// Update the caller's profile: email, password and/or attendance.
#[utoipa::path(
    put,
    path = "/v1/auth/profile",
    request_body = UpdateProfileRequest,
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile updated", body = VerifyResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated or wrong current password"),
        (status = 404, description = "Account no longer exists"),
        (status = 409, description = "Email already taken")
    )
)]
pub async fn update_profile(
    Auth(claims): Auth,
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    if request.email.is_none() && request.new_password.is_none() && request.is_attending.is_none() {
        return Err(ApiError::bad_request(
            "Email, new password or attendance required",
        ));
    }

    let users = UserRepository::new(&state.store);
    let mut user = users
        .get(&claims.sub)
        .map_err(|_| ApiError::not_found("User not found"))?;

    if let Some(email) = request.email {
        if email != user.email {
            if !is_valid_email(&email) {
                return Err(ApiError::bad_request("Invalid email address"));
            }
            if let Some(existing) = users.find_by_email(&email)? {
                if existing.id != user.id {
                    return Err(ApiError::conflict("Email address already taken"));
                }
            }
            user.email = email;
        }
    }

    if let Some(new_password) = request.new_password {
        let Some(current_password) = request.current_password else {
            return Err(ApiError::bad_request("Current password required"));
        };
        if !verify_password(&state, current_password, user.password_hash.clone()).await? {
            return Err(ApiError::unauthorized("Current password is incorrect"));
        }
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::bad_request(
                "New password must be at least 6 characters",
            ));
        }
        user.password_hash = hash_password(&state, new_password).await?;
    }

    if let Some(is_attending) = request.is_attending {
        user.is_attending = is_attending;
    }

    users.update(&user)?;

    Ok(Json(VerifyResponse {
        success: true,
        user: UserProfile::from(&user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::config::AppConfig;
    use crate::storage::{DataStore, StoragePaths, StoredEvent};
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let mut store = DataStore::new(StoragePaths::new(dir.path()));
        store.initialize().expect("initialize");

        EventRepository::new(&store)
            .put(&StoredEvent::new("LAN 2026".into(), "letmein".into()))
            .expect("seed event");

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

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: "hunter2".into(),
            registration_password: "letmein".into(),
        }
    }

    #[tokio::test]
    async fn register_login_verify_flow() {
        let (state, _dir) = test_state();

        let (status, Json(created)) = register(
            State(state.clone()),
            Json(register_request("alice", "alice@example.com")),
        )
        .await
        .expect("registration succeeds");
        assert_eq!(status, StatusCode::CREATED);
        assert!(created.success);
        assert!(!created.user.is_admin);

        let Json(logged_in) = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "alice".into(),
                password: "hunter2".into(),
            }),
        )
        .await
        .expect("login succeeds");

        let claims = state.tokens.verify(&logged_in.token).expect("valid token");
        assert_eq!(claims.username, "alice");

        let Json(verified) = verify(crate::auth::Auth(claims), State(state.clone()))
            .await
            .expect("verify succeeds");
        assert_eq!(verified.user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn register_rejects_wrong_registration_password() {
        let (state, _dir) = test_state();

        let mut request = register_request("alice", "alice@example.com");
        request.registration_password = "wrong".into();

        let err = register(State(state), Json(request)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_rejects_duplicates() {
        let (state, _dir) = test_state();

        register(
            State(state.clone()),
            Json(register_request("alice", "alice@example.com")),
        )
        .await
        .unwrap();

        let err = register(
            State(state.clone()),
            Json(register_request("alice", "other@example.com")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err = register(
            State(state),
            Json(register_request("bob", "alice@example.com")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn register_validates_inputs() {
        let (state, _dir) = test_state();

        let mut short_name = register_request("al", "alice@example.com");
        short_name.username = "al".into();
        let err = register(State(state.clone()), Json(short_name))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let bad_email = register_request("alice", "not-an-email");
        let err = register(State(state.clone()), Json(bad_email))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let mut short_password = register_request("alice", "alice@example.com");
        short_password.password = "12345".into();
        let err = register(State(state), Json(short_password))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_does_not_reveal_which_part_failed() {
        let (state, _dir) = test_state();

        register(
            State(state.clone()),
            Json(register_request("alice", "alice@example.com")),
        )
        .await
        .unwrap();

        let unknown_user = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "nobody".into(),
                password: "hunter2".into(),
            }),
        )
        .await
        .unwrap_err();

        let wrong_password = login(
            State(state),
            Json(LoginRequest {
                username: "alice".into(),
                password: "wrong!".into(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_user.message, wrong_password.message);
    }

    #[tokio::test]
    async fn update_profile_changes_password_and_attendance() {
        let (state, _dir) = test_state();

        let (_, Json(created)) = register(
            State(state.clone()),
            Json(register_request("alice", "alice@example.com")),
        )
        .await
        .unwrap();
        let claims = state.tokens.verify(&created.token).unwrap();

        // Password change requires the current password.
        let err = update_profile(
            crate::auth::Auth(claims.clone()),
            State(state.clone()),
            Json(UpdateProfileRequest {
                new_password: Some("newpass1".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let Json(updated) = update_profile(
            crate::auth::Auth(claims.clone()),
            State(state.clone()),
            Json(UpdateProfileRequest {
                current_password: Some("hunter2".into()),
                new_password: Some("newpass1".into()),
                is_attending: Some(true),
                ..Default::default()
            }),
        )
        .await
        .expect("update succeeds");
        assert!(updated.user.is_attending);

        // Old password no longer works, new one does.
        let err = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "alice".into(),
                password: "hunter2".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        login(
            State(state),
            Json(LoginRequest {
                username: "alice".into(),
                password: "newpass1".into(),
            }),
        )
        .await
        .expect("login with new password");
    }

    #[tokio::test]
    async fn update_profile_requires_some_field() {
        let (state, _dir) = test_state();

        let (_, Json(created)) = register(
            State(state.clone()),
            Json(register_request("alice", "alice@example.com")),
        )
        .await
        .unwrap();
        let claims = state.tokens.verify(&created.token).unwrap();

        let err = update_profile(
            crate::auth::Auth(claims),
            State(state),
            Json(UpdateProfileRequest::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn email_validation_matches_expectations() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email("user@example."));
    }
}
