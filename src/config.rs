//! Runtime configuration.
//!
//! Defaults merged with `FRONTDESK_`-prefixed environment variables, e.g.
//! `FRONTDESK_GYM__DATABASE_URL=sqlite:gym.db` or
//! `FRONTDESK_COOKIE_SECRET=...`. Loaded once into the `CONFIG` static.

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|e| {
        eprintln!("invalid configuration: {e}");
        std::process::exit(1);
    })
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub loglevel: String,
    /// Secret the session cookie key is derived from. At least 32 bytes.
    pub cookie_secret: String,
    pub gym: GymConfig,
    pub library: LibraryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub admin_email: String,
    pub admin_password: String,
    /// Seed the starter catalog on an empty books table.
    pub seed_books: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: "info".to_string(),
            cookie_secret: "frontdesk-dev-cookie-secret-change-me-in-production".to_string(),
            gym: GymConfig {
                database_url: "sqlite:gym.db".to_string(),
                bind_addr: "0.0.0.0:8000".to_string(),
                admin_name: "Admin".to_string(),
                admin_email: "admin@gym.com".to_string(),
                admin_password: "admin123".to_string(),
            },
            library: LibraryConfig {
                database_url: "sqlite:library.db".to_string(),
                bind_addr: "0.0.0.0:8001".to_string(),
                admin_email: "admin@gmail.com".to_string(),
                admin_password: "admin123".to_string(),
                seed_books: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("FRONTDESK_").split("__"))
            .extract()
    }
}
