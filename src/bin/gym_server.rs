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
        database_url = %cfg.gym.database_url,
        bind_addr = %cfg.gym.bind_addr,
        loglevel = %cfg.loglevel,
    );

    let pool = frontdesk::db::connect(&cfg.gym.database_url).await?;
    let store = frontdesk::gym::GymStorage::new(pool);
    store.init_schema().await?;

    // Bootstrap admin account, once.
    let password_hash = bcrypt::hash(&cfg.gym.admin_password, bcrypt::DEFAULT_COST)?;
    if store
        .ensure_admin(&cfg.gym.admin_name, &cfg.gym.admin_email, &password_hash)
        .await?
    {
        info!(email = %cfg.gym.admin_email, "bootstrap admin created");
    }

    let state = frontdesk::gym::GymState::new(store, &cfg.cookie_secret);
    let app = frontdesk::gym::gym_router(state);

    let listener = TcpListener::bind(&cfg.gym.bind_addr).await?;
    info!("gym server listening on {}", cfg.gym.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
