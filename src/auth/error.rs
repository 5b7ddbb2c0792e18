// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::claims::Denial;

/// Authentication/authorization rejection.
///
/// Deliberately coarse: a request learns only "not authenticated" or
/// "not allowed", never which check failed.
#[derive(Debug)]
pub enum AuthError {
    /// Missing, malformed or invalid credentials
    NotAuthenticated,
    /// Authenticated but lacking the required privilege
    InsufficientPermissions,
}

#[derive(Serialize)]
struct AuthErrorBody {
    success: bool,
    error: String,
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
        }
    }

    /// Map an admin-gate denial onto the error variant with the same
    /// status.
    pub fn from_denial(denial: Denial) -> Self {
        if denial.status == StatusCode::FORBIDDEN {
            AuthError::InsufficientPermissions
        } else {
            AuthError::NotAuthenticated
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
            AuthError::InsufficientPermissions => write!(f, "Admin privileges required"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            success: false,
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
