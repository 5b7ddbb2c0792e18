// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Token claims, authentication outcomes and the admin gate.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity claim embedded in every issued token.
///
/// The claim is a snapshot taken at login time. The admin flag and
/// username reflect the user's state when the token was issued; a later
/// promotion or rename only shows up once the user logs in again. Callers
/// that need the fresh state must re-read the user record themselves.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Claims {
    /// User ID (JWT subject)
    pub sub: String,
    /// Username at issuance time
    pub username: String,
    /// Admin flag at issuance time
    pub is_admin: bool,
    /// Issued-at (Unix timestamp, seconds)
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds). Absent unless a token TTL is
    /// configured; tokens without it never expire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Check if this claim carries admin privileges.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// Outcome of authenticating a request.
///
/// Malformed or absent credentials are a value, not an error: every
/// failure mode collapses into `Anonymous`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAttempt {
    /// A valid token was presented; carries the decoded claim.
    Authenticated(Claims),
    /// No token, wrong scheme, or an invalid/tampered token.
    Anonymous,
}

impl AuthAttempt {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthAttempt::Authenticated(_))
    }

    /// The decoded claim, if authenticated.
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            AuthAttempt::Authenticated(claims) => Some(claims),
            AuthAttempt::Anonymous => None,
        }
    }
}

/// A refused authorization check: HTTP status plus a short message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub status: StatusCode,
    pub error: String,
}

/// The admin gate.
///
/// Rule table, evaluated in order: unauthenticated → 401, authenticated
/// without the admin flag → 403, otherwise permitted (`None`). Pure
/// function of its input.
pub fn require_admin(attempt: &AuthAttempt) -> Option<Denial> {
    match attempt {
        AuthAttempt::Anonymous => Some(Denial {
            status: StatusCode::UNAUTHORIZED,
            error: "Not authenticated".to_string(),
        }),
        AuthAttempt::Authenticated(claims) if !claims.is_admin => Some(Denial {
            status: StatusCode::FORBIDDEN,
            error: "Admin privileges required".to_string(),
        }),
        AuthAttempt::Authenticated(_) => None,
    }
}
