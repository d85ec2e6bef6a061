use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::identity::Identity;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
/// Admin checks happen via `require_admin()` in the handler body.
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub is_admin: bool,
}

impl AuthUser {
    pub fn identity(&self) -> Identity {
        Identity::new(Some(self.user_id), self.is_admin)
    }

    /// Returns `Err(PermissionDenied)` unless the user is an admin.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

/// Identity for routes where authentication is optional.
///
/// No header yields an anonymous identity; a header carrying a bad token is
/// still rejected.
pub struct MaybeAuthUser(pub Identity);

fn bearer_claims(parts: &Parts, state: &AppState) -> Result<Option<jwt::Claims>, AppError> {
    let Some(header) = parts.headers.get("Authorization") else {
        return Ok(None);
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::TokenInvalid)?;

    jwt::verify(token, &state.config.auth.jwt_secret)
        .map(Some)
        .map_err(|_| AppError::TokenInvalid)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state)?.ok_or(AppError::TokenMissing)?;
        // Routes behind this extractor act on behalf of a concrete user.
        let user_id = claims.uid.ok_or(AppError::TokenInvalid)?;

        Ok(AuthUser {
            user_id,
            username: claims.sub,
            is_admin: claims.adm,
        })
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = bearer_claims(parts, state)?
            .map(|claims| claims.identity())
            .unwrap_or_else(Identity::anonymous);
        Ok(MaybeAuthUser(identity))
    }
}
