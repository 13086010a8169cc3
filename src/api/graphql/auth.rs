//! Bearer-token authentication for the GraphQL context.
//!
//! A valid token (HTTP header or WebSocket `connection_init` payload) puts
//! a `CurrentUser` into the request's context data; absence or invalidity
//! leaves the context anonymous. Guards turn a missing user into an
//! `unauthenticated` rejection and a missing role into `forbidden` — the
//! failure never degrades silently.

use async_graphql::Context;
use uuid::Uuid;

use crate::domain::UserRole;
use crate::errors::AppError;
use crate::services::Claims;

/// Authenticated caller extracted from a verified JWT
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Build from verified token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email.clone(),
            role: UserRole::from(claims.role.as_str()),
        }
    }

    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// The caller, if the request carried a valid token
pub fn current_user<'a>(ctx: &'a Context<'_>) -> Option<&'a CurrentUser> {
    ctx.data_opt::<CurrentUser>()
}

/// Require an authenticated caller
pub fn require_auth<'a>(ctx: &'a Context<'_>) -> Result<&'a CurrentUser, AppError> {
    current_user(ctx).ok_or(AppError::Unauthorized)
}

/// Require an authenticated admin
pub fn require_admin<'a>(ctx: &'a Context<'_>) -> Result<&'a CurrentUser, AppError> {
    let user = require_auth(ctx)?;
    if user.is_admin() {
        Ok(user)
    } else {
        Err(AppError::Forbidden)
    }
}
