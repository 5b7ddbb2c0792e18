// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! # Authentication Module
//!
//! Credential hashing, token issuance/verification and the per-request
//! authentication/authorization steps every handler shares.
//!
//! ## Auth Flow
//!
//! 1. `POST /v1/auth/register` / `POST /v1/auth/login` verify credentials
//!    against the user store and issue a signed token
//! 2. The client sends `Authorization: Bearer <token>` on every request
//! 3. The server verifies the signature and extracts the identity
//!    snapshot `{user id, username, admin flag}` — no database access
//! 4. Admin routes additionally check the snapshot's admin flag
//!
//! ## Security
//!
//! - The signing secret is required configuration; startup fails without it
//! - Tokens are non-expiring by default (logout is client-local); a TTL
//!   and a revocation hook are available as explicit options
//! - Auth failures surface only as generic 401/403 responses

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod token;

pub use claims::{require_admin, AuthAttempt, Claims, Denial};
pub use error::AuthError;
pub use extractor::{authenticate, AdminOnly, Auth, OptionalAuth};
pub use password::{CredentialHasher, HashingError};
pub use token::{RevocationCheck, TokenService};
