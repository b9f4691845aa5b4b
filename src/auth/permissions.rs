// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permissions and the permission gate.
//!
//! Roles are resolved into flat permission lists by the identity provider,
//! so the gate only does set membership: no wildcards, no hierarchy.

use std::collections::HashSet;

use super::error::AuthError;

/// A permission a route can require.
///
/// ## Catalogue
///
/// | Permission | Grants |
/// |------------|--------|
/// | `get:actor` / `get:movie` | list records |
/// | `post:actor` / `post:movie` | create records |
/// | `patch:actor` / `patch:movie` | update records |
/// | `delete:actor` / `delete:movie` | delete records |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    GetActor,
    PostActor,
    PatchActor,
    DeleteActor,
    GetMovie,
    PostMovie,
    PatchMovie,
    DeleteMovie,
}

impl Permission {
    /// Wire form, as it appears in the token's `permissions` claim.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::GetActor => "get:actor",
            Permission::PostActor => "post:actor",
            Permission::PatchActor => "patch:actor",
            Permission::DeleteActor => "delete:actor",
            Permission::GetMovie => "get:movie",
            Permission::PostMovie => "post:movie",
            Permission::PatchMovie => "patch:movie",
            Permission::DeleteMovie => "delete:movie",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permissions granted by a verified token.
///
/// Kept as raw strings: tokens may carry permissions this service does not
/// know about, and those must not make the token unusable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(HashSet<String>);

impl PermissionSet {
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(permission.as_str())
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Allow iff `required` is a member of `have`.
pub fn check(required: Permission, have: &PermissionSet) -> Result<(), AuthError> {
    if have.contains(required) {
        Ok(())
    } else {
        Err(AuthError::InsufficientScope(required))
    }
}
