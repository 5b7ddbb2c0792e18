// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

use std::sync::Arc;

use crate::auth::{CredentialHasher, TokenService};
use crate::config::AppConfig;
use crate::storage::DataStore;

/// Shared application state. Everything in here is immutable after
/// startup; per-request state lives in the request itself.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DataStore>,
    pub tokens: Arc<TokenService>,
    pub hasher: Arc<CredentialHasher>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: DataStore, tokens: TokenService, config: AppConfig) -> Self {
        Self {
            store: Arc::new(store),
            tokens: Arc::new(tokens),
            hasher: Arc::new(CredentialHasher::default()),
            config: Arc::new(config),
        }
    }
}
