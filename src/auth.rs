//! Session cookie handling and the per-request authenticated identity.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use model::entities::user::{self, UserRole};
use tracing::{debug, error, trace};

use crate::error::ApiError;
use crate::schemas::AppState;

pub const SESSION_COOKIE: &str = "campus_session";

pub fn build_session_cookie(token: String, ttl: chrono::Duration) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// The authenticated user behind the current request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: user::Model,
    pub token: String,
}

impl AuthContext {
    pub fn user_id(&self) -> i32 {
        self.user.id
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == UserRole::Admin
    }

    /// Fails with 403 unless the caller has one of `roles`.
    pub fn require_role(&self, roles: &[UserRole]) -> Result<(), ApiError> {
        if roles.contains(&self.user.role) {
            Ok(())
        } else {
            debug!(
                "User {} with role {:?} denied; needs one of {:?}",
                self.user.id, self.user.role, roles
            );
            Err(ApiError::forbidden("Access denied"))
        }
    }
}

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<AuthContext>, ApiError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned()) else {
        trace!("No session cookie on request");
        return Ok(None);
    };
    if token.is_empty() {
        return Ok(None);
    }

    let found = service::sessions::resolve_session(&state.db, &token, Utc::now()).await?;
    Ok(found.map(|(_, user)| AuthContext { user, token }))
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve(parts, state).await?.ok_or(ApiError::Unauthenticated)
    }
}

/// Page-route flavour of [`AuthContext`]: anonymous visitors are sent to
/// the login form instead of receiving a JSON error.
#[derive(Debug, Clone)]
pub struct PageAuth(pub AuthContext);

#[axum::async_trait]
impl FromRequestParts<AppState> for PageAuth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve(parts, state).await {
            Ok(Some(context)) => Ok(PageAuth(context)),
            Ok(None) => Err(Redirect::to("/login").into_response()),
            Err(e) => {
                error!("Failed to resolve session: {}", e);
                Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
            }
        }
    }
}
