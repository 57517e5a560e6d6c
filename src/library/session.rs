//! Cookie-backed session for the library app.
//!
//! The admin account lives in configuration, not in the users table, so the
//! admin session carries no user id. Members always have one.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::error::FrontdeskError;

pub const SESSION_COOKIE: &str = "library_session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibrarySession {
    pub user_id: Option<i64>,
    pub username: String,
    pub is_admin: bool,
}

pub fn store_session(jar: PrivateCookieJar, session: &LibrarySession) -> PrivateCookieJar {
    let value = serde_json::to_string(session).unwrap_or_default();
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

pub fn clear_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build())
}

async fn session_from_parts<S>(parts: &mut Parts, state: &S) -> Option<LibrarySession>
where
    S: Send + Sync,
    Key: axum::extract::FromRef<S>,
{
    let jar: PrivateCookieJar<Key> = match PrivateCookieJar::from_request_parts(parts, state).await {
        Ok(jar) => jar,
        Err(never) => match never {},
    };
    let cookie = jar.get(SESSION_COOKIE)?;
    serde_json::from_str(cookie.value()).ok()
}

/// Any logged-in session, member or admin.
#[derive(Debug, Clone)]
pub struct Authenticated(pub LibrarySession);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
    Key: axum::extract::FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match session_from_parts(parts, state).await {
            Some(session) => Ok(Self(session)),
            None => Err(FrontdeskError::AccessDenied.into_response()),
        }
    }
}

/// Requires the admin flag.
#[derive(Debug, Clone)]
pub struct AdminSession(pub LibrarySession);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    Key: axum::extract::FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match session_from_parts(parts, state).await {
            Some(session) if session.is_admin => Ok(Self(session)),
            _ => Err(FrontdeskError::AccessDenied.into_response()),
        }
    }
}
