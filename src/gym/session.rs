//! Cookie-backed session for the gym app.
//!
//! The session payload (`user_id` + role) is serialized to JSON and stored
//! in an encrypted private cookie. Role gates are extractors: a handler that
//! takes `AdminSession` cannot run without an admin session, and the
//! rejection is the access-denied redirect.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FrontdeskError;

pub const SESSION_COOKIE: &str = "gym_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Customer => write!(f, "customer"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub role: Role,
}

/// Add the session cookie to the jar after a successful login.
pub fn store_session(jar: PrivateCookieJar, session: SessionUser) -> PrivateCookieJar {
    // Serialization of a two-field struct cannot fail.
    let value = serde_json::to_string(&session).unwrap_or_default();
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

fn read_session(jar: &PrivateCookieJar) -> Option<SessionUser> {
    let cookie = jar.get(SESSION_COOKIE)?;
    serde_json::from_str(cookie.value()).ok()
}

async fn session_from_parts<S>(parts: &mut Parts, state: &S) -> Option<SessionUser>
where
    S: Send + Sync,
    Key: axum::extract::FromRef<S>,
{
    let jar = match PrivateCookieJar::from_request_parts(parts, state).await {
        Ok(jar) => jar,
        Err(never) => match never {},
    };
    read_session(&jar)
}

/// Requires `role == admin`.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession(pub SessionUser);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    Key: axum::extract::FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match session_from_parts(parts, state).await {
            Some(session) if session.role == Role::Admin => Ok(Self(session)),
            _ => Err(FrontdeskError::AccessDenied.into_response()),
        }
    }
}

/// Requires `role == customer`.
#[derive(Debug, Clone, Copy)]
pub struct CustomerSession(pub SessionUser);

impl<S> FromRequestParts<S> for CustomerSession
where
    S: Send + Sync,
    Key: axum::extract::FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match session_from_parts(parts, state).await {
            Some(session) if session.role == Role::Customer => Ok(Self(session)),
            _ => Err(FrontdeskError::AccessDenied.into_response()),
        }
    }
}

/// Requires any logged-in session, admin or customer.
#[derive(Debug, Clone, Copy)]
pub struct AnySession(pub SessionUser);

impl<S> FromRequestParts<S> for AnySession
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
