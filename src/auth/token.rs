// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Token issuance and verification.
//!
//! Tokens are HMAC-signed JWTs (HS256) carrying a [`Claims`] snapshot.
//! The signing secret is injected at construction; there is no fallback,
//! and a process without a secret must not start (enforced in config).
//!
//! By default tokens carry no expiry and stay valid until the signing
//! key changes or the client discards them; logout is client-local
//! deletion. Deployments that want bounded lifetimes set a TTL, and a
//! revocation-check collaborator can be attached to reject tokens the
//! application considers withdrawn.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::Claims;

/// Collaborator consulted on every verification. Return `true` to treat
/// the token as invalid even though its signature checks out.
pub trait RevocationCheck: Send + Sync {
    fn is_revoked(&self, claims: &Claims) -> bool;
}

/// Issues and verifies identity tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Option<Duration>,
    revocation: Option<Arc<dyn RevocationCheck>>,
}

impl TokenService {
    /// Create a service signing with the given secret. Tokens do not
    /// expire unless a TTL is added via [`with_ttl`](Self::with_ttl).
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: None,
            revocation: None,
        }
    }

    /// Issue tokens that expire after `ttl`.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Attach a revocation check consulted on every verification.
    pub fn with_revocation(mut self, check: Arc<dyn RevocationCheck>) -> Self {
        self.revocation = Some(check);
        self
    }

    /// Issue a signed token for the given identity snapshot.
    pub fn issue(
        &self,
        user_id: &str,
        username: &str,
        is_admin: bool,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            is_admin,
            iat: now.timestamp(),
            exp: self.ttl.map(|ttl| (now + ttl).timestamp()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Verify a token's signature (and expiry, when present) and return
    /// its claims. Any malformed, tampered, wrong-key, expired or revoked
    /// token yields `None`; verification never fails with an error.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens without a TTL have no exp claim at all; the exp check
        // still applies to tokens that carry one.
        validation.required_spec_claims.clear();
        validation.validate_exp = true;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).ok()?;

        if let Some(revocation) = &self.revocation {
            if revocation.is_revoked(&data.claims) {
                return None;
            }
        }

        Some(data.claims)
    }
}
