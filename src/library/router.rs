use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

use crate::library::handlers;
use crate::library::store::LibraryStorage;

#[derive(Clone)]
pub struct LibraryState {
    pub store: LibraryStorage,
    pub admin_email: Arc<str>,
    pub admin_password: Arc<str>,
    key: Key,
}

impl LibraryState {
    pub fn new(
        store: LibraryStorage,
        admin_email: &str,
        admin_password: &str,
        cookie_secret: &str,
    ) -> Self {
        Self {
            store,
            admin_email: Arc::from(admin_email),
            admin_password: Arc::from(admin_password),
            key: Key::derive_from(cookie_secret.as_bytes()),
        }
    }
}

impl FromRef<LibraryState> for Key {
    fn from_ref(state: &LibraryState) -> Self {
        state.key.clone()
    }
}

pub fn library_router(state: LibraryState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/sign_up", post(handlers::sign_up))
        .route("/login", post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/books", get(handlers::books))
        .route("/borrow/{book_id}", get(handlers::borrow_book))
        .route("/return/{record_id}", get(handlers::return_book))
        .route("/my_borrowed_books", get(handlers::my_borrowed_books))
        .route("/all_users", get(handlers::all_users))
        .route("/update_user/{id}", post(handlers::update_user))
        .route("/delete_user/{id}", post(handlers::delete_user))
        .route("/add_book", post(handlers::add_book))
        .route("/edit_book/{id}", post(handlers::edit_book))
        .route("/delete_book/{id}", post(handlers::delete_book))
        .with_state(state)
}
