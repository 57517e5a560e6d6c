//! Library-borrowing system: users, books, borrow records.

pub mod handlers;
pub mod models;
pub mod router;
pub mod schema;
pub mod session;
pub mod store;

pub use router::{LibraryState, library_router};
pub use store::LibraryStorage;
