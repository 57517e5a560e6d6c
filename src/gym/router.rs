use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum_extra::extract::cookie::Key;

use crate::gym::handlers;
use crate::gym::store::GymStorage;

#[derive(Clone)]
pub struct GymState {
    pub store: GymStorage,
    key: Key,
}

impl GymState {
    pub fn new(store: GymStorage, cookie_secret: &str) -> Self {
        Self {
            store,
            key: Key::derive_from(cookie_secret.as_bytes()),
        }
    }
}

// Lets PrivateCookieJar pull its key out of the router state.
impl FromRef<GymState> for Key {
    fn from_ref(state: &GymState) -> Self {
        state.key.clone()
    }
}

pub fn gym_router(state: GymState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/customer/dashboard", get(handlers::customer_dashboard))
        .route("/admin/dashboard", get(handlers::admin_dashboard))
        .route("/admin/customers", get(handlers::customers_list))
        .route("/admin/customers/add", post(handlers::add_customer))
        .route(
            "/admin/customers/update/{id}",
            post(handlers::update_customer),
        )
        .route(
            "/admin/customers/delete/{id}",
            post(handlers::delete_customer),
        )
        .route(
            "/admin/customers/{id}/payments",
            get(handlers::customer_payments),
        )
        .route(
            "/admin/customers/{id}/payments/add",
            post(handlers::record_payment),
        )
        .route(
            "/admin/customers/{id}/entries/add",
            post(handlers::record_entry),
        )
        .route("/payments", get(handlers::payment_history))
        .route("/entry_logs", get(handlers::entry_logs))
        .with_state(state)
}
