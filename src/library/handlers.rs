use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use axum_extra::extract::cookie::PrivateCookieJar;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use subtle::ConstantTimeEq;
use tracing::info;

use crate::error::FrontdeskError;
use crate::library::router::LibraryState;
use crate::library::session::{
    AdminSession, Authenticated, LibrarySession, clear_session, store_session,
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Deserialize)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct BookForm {
    pub title: String,
    pub author: String,
}

pub async fn index() -> Json<serde_json::Value> {
    Json(json!({ "service": "library", "status": "ok" }))
}

/// POST /sign_up
pub async fn sign_up(
    State(state): State<LibraryState>,
    Form(form): Form<SignUpForm>,
) -> Result<Redirect, FrontdeskError> {
    if state.store.find_user_by_email(&form.email).await?.is_some() {
        return Err(FrontdeskError::DuplicateEmail);
    }
    let id = state
        .store
        .create_user(&form.name, &form.email, &form.password)
        .await?;
    info!(user_id = id, "user signed up");
    Ok(Redirect::to("/login"))
}

/// POST /login — the configured admin account is checked before the users
/// table; password comparisons are constant-time.
pub async fn login(
    State(state): State<LibraryState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, FrontdeskError> {
    if form.email == state.admin_email.as_ref()
        && bool::from(
            form.password
                .as_bytes()
                .ct_eq(state.admin_password.as_bytes()),
        )
    {
        let session = LibrarySession {
            user_id: None,
            username: "Admin".to_string(),
            is_admin: true,
        };
        info!("admin login successful");
        return Ok((store_session(jar, &session), Redirect::to("/all_users")));
    }

    let user = state
        .store
        .find_user_by_email(&form.email)
        .await?
        .ok_or(FrontdeskError::InvalidCredentials)?;
    if !bool::from(form.password.as_bytes().ct_eq(user.password.as_bytes())) {
        return Err(FrontdeskError::InvalidCredentials);
    }

    let session = LibrarySession {
        user_id: Some(user.id),
        username: user.username,
        is_admin: false,
    };
    info!(user_id = user.id, "member login successful");
    Ok((store_session(jar, &session), Redirect::to("/books")))
}

pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (clear_session(jar), Redirect::to("/login"))
}

/// GET /books — full catalog, any logged-in session.
pub async fn books(
    State(state): State<LibraryState>,
    Authenticated(_): Authenticated,
) -> Result<Json<serde_json::Value>, FrontdeskError> {
    let books = state.store.list_books().await?;
    Ok(Json(json!({ "books": books })))
}

/// GET /borrow/{book_id} — members only; the admin has no user row to
/// attach a record to.
pub async fn borrow_book(
    State(state): State<LibraryState>,
    Authenticated(session): Authenticated,
    Path(book_id): Path<i64>,
) -> Result<Redirect, FrontdeskError> {
    let user_id = session.user_id.ok_or(FrontdeskError::AccessDenied)?;
    let record_id = state
        .store
        .borrow_book(user_id, book_id, Utc::now().date_naive())
        .await?;
    info!(user_id, book_id, record_id, "book borrowed");
    Ok(Redirect::to("/my_borrowed_books"))
}

/// GET /return/{record_id} — returning an already-returned record is
/// informational, not an error, and mutates nothing.
pub async fn return_book(
    State(state): State<LibraryState>,
    Authenticated(session): Authenticated,
    Path(record_id): Path<i64>,
) -> Result<Response, FrontdeskError> {
    let user_id = session.user_id.ok_or(FrontdeskError::AccessDenied)?;
    let newly_returned = state
        .store
        .return_record(record_id, Utc::now().date_naive())
        .await?;
    if !newly_returned {
        return Ok(Json(json!({ "message": "This book has already been returned." }))
            .into_response());
    }
    info!(user_id, record_id, "book returned");
    Ok(Redirect::to("/my_borrowed_books").into_response())
}

/// GET /my_borrowed_books
pub async fn my_borrowed_books(
    State(state): State<LibraryState>,
    Authenticated(session): Authenticated,
) -> Result<Json<serde_json::Value>, FrontdeskError> {
    let user_id = session.user_id.ok_or(FrontdeskError::AccessDenied)?;
    let records = state.store.records_for_user(user_id).await?;
    Ok(Json(json!({ "records": records })))
}

/// GET /all_users?search=
pub async fn all_users(
    State(state): State<LibraryState>,
    AdminSession(_): AdminSession,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, FrontdeskError> {
    let users = state.store.search_users(&params.search).await?;
    Ok(Json(json!({ "users": users, "search": params.search })))
}

/// POST /update_user/{id} — full replace, like the legacy form.
pub async fn update_user(
    State(state): State<LibraryState>,
    AdminSession(_): AdminSession,
    Path(id): Path<i64>,
    Form(form): Form<UserForm>,
) -> Result<Redirect, FrontdeskError> {
    state
        .store
        .update_user(id, &form.name, &form.email, &form.password)
        .await?;
    info!(user_id = id, "user updated");
    Ok(Redirect::to("/all_users"))
}

/// POST /delete_user/{id} — borrow records go with the user.
pub async fn delete_user(
    State(state): State<LibraryState>,
    AdminSession(_): AdminSession,
    Path(id): Path<i64>,
) -> Result<Redirect, FrontdeskError> {
    state.store.delete_user(id).await?;
    info!(user_id = id, "user deleted");
    Ok(Redirect::to("/all_users"))
}

/// POST /add_book
pub async fn add_book(
    State(state): State<LibraryState>,
    AdminSession(_): AdminSession,
    Form(form): Form<BookForm>,
) -> Result<Redirect, FrontdeskError> {
    let id = state.store.create_book(&form.title, &form.author).await?;
    info!(book_id = id, title = %form.title, "book added");
    Ok(Redirect::to("/books"))
}

/// POST /edit_book/{id} — title/author only; availability stays with the
/// borrow flow.
pub async fn edit_book(
    State(state): State<LibraryState>,
    AdminSession(_): AdminSession,
    Path(id): Path<i64>,
    Form(form): Form<BookForm>,
) -> Result<Redirect, FrontdeskError> {
    state.store.update_book(id, &form.title, &form.author).await?;
    info!(book_id = id, "book updated");
    Ok(Redirect::to("/books"))
}

/// POST /delete_book/{id}
pub async fn delete_book(
    State(state): State<LibraryState>,
    AdminSession(_): AdminSession,
    Path(id): Path<i64>,
) -> Result<Redirect, FrontdeskError> {
    state.store.delete_book(id).await?;
    info!(book_id = id, "book deleted");
    Ok(Redirect::to("/books"))
}
