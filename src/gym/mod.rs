//! Gym-membership manager: admin/customer accounts, payments, entry logs.
//!
//! Layout mirrors the sibling `library` module:
//! - `models.rs`: row structs and form payloads
//! - `schema.rs`: SQL DDL
//! - `store.rs`: all queries against the gym database
//! - `session.rs`: cookie session payload and role-gate extractors
//! - `handlers.rs` / `router.rs`: the HTTP surface

pub mod handlers;
pub mod models;
pub mod router;
pub mod schema;
pub mod session;
pub mod store;

pub use router::{GymState, gym_router};
pub use store::GymStorage;
