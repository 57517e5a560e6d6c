pub mod config;
pub mod db;
pub mod error;
pub mod gym;
pub mod library;

pub use error::FrontdeskError;
