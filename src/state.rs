// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::Authorizer;
use crate::storage::CastingDatabase;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<CastingDatabase>,
    pub authorizer: Arc<Authorizer>,
}

impl AppState {
    pub fn new(db: CastingDatabase, authorizer: Authorizer) -> Self {
        Self {
            db: Arc::new(db),
            authorizer: Arc::new(authorizer),
        }
    }
}
