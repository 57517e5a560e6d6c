use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &frontdesk::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.library.database_url,
        bind_addr = %cfg.library.bind_addr,
        loglevel = %cfg.loglevel,
    );

    let pool = frontdesk::db::connect(&cfg.library.database_url).await?;
    let store = frontdesk::library::LibraryStorage::new(pool);
    store.init_schema().await?;

    if cfg.library.seed_books {
        let seeded = store.seed_starter_books().await?;
        if seeded > 0 {
            info!(count = seeded, "starter catalog seeded");
        }
    }

    let state = frontdesk::library::LibraryState::new(
        store,
        &cfg.library.admin_email,
        &cfg.library.admin_password,
        &cfg.cookie_secret,
    );
    let app = frontdesk::library::library_router(state);

    let listener = TcpListener::bind(&cfg.library.bind_addr).await?;
    info!("library server listening on {}", cfg.library.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
