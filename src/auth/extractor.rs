// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Request authentication and Axum extractors.
//!
//! [`authenticate`] is the header-to-identity step every handler shares:
//! it looks for `Authorization: Bearer <token>` and collapses every
//! failure mode (missing header, wrong scheme, invalid token) into
//! [`AuthAttempt::Anonymous`] without touching storage.
//!
//! Handlers use the `Auth` extractor to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims is the decoded identity snapshot
//! }
//! ```
//!
//! and `AdminOnly` for privileged routes.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{require_admin, AuthAttempt, AuthError, Claims, TokenService};
use crate::state::AppState;

/// Authenticate a request from its headers.
///
/// The claim in a successful attempt is the issuance-time snapshot; it is
/// not checked against the user store here.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> AuthAttempt {
    let Some(header) = headers.get(AUTHORIZATION) else {
        return AuthAttempt::Anonymous;
    };
    let Ok(header) = header.to_str() else {
        return AuthAttempt::Anonymous;
    };
    let Some(token) = header.strip_prefix("Bearer ") else {
        return AuthAttempt::Anonymous;
    };

    match tokens.verify(token.trim()) {
        Some(claims) => AuthAttempt::Authenticated(claims),
        None => AuthAttempt::Anonymous,
    }
}

/// Extractor for authenticated users. Rejects with 401 when the request
/// carries no valid token.
pub struct Auth(pub Claims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authenticate(&parts.headers, &state.tokens) {
            AuthAttempt::Authenticated(claims) => Ok(Auth(claims)),
            AuthAttempt::Anonymous => Err(AuthError::NotAuthenticated),
        }
    }
}

/// Extractor that additionally requires the admin flag. Rejects with 401
/// for anonymous requests and 403 for authenticated non-admins.
pub struct AdminOnly(pub Claims);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let attempt = authenticate(&parts.headers, &state.tokens);

        if let Some(denial) = require_admin(&attempt) {
            return Err(AuthError::from_denial(denial));
        }

        // require_admin returning None guarantees an authenticated claim.
        match attempt {
            AuthAttempt::Authenticated(claims) => Ok(AdminOnly(claims)),
            AuthAttempt::Anonymous => Err(AuthError::NotAuthenticated),
        }
    }
}

/// Optional authentication: `None` instead of a rejection when no valid
/// token is present.
pub struct OptionalAuth(pub Option<Claims>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authenticate(&parts.headers, &state.tokens) {
            AuthAttempt::Authenticated(claims) => Ok(OptionalAuth(Some(claims))),
            AuthAttempt::Anonymous => Ok(OptionalAuth(None)),
        }
    }
}
