use std::sync::Arc;

use axum_login::tower_sessions::ExpiredDeletion;
use ministry::{
    config::Config,
    database::setup_database,
    push::expo::ExpoClient,
    router::{AppState, create_router, shutdown_signal},
    services::people,
};
use sea_orm::sqlx::PgPool;
use tokio::net::TcpListener;
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = setup_database(&config.database_url).await?;
    if let Some((email, password)) = config.bootstrap_admin.clone() {
        if let Some(admin) = people::bootstrap_admin(&db, &email, password).await? {
            info!(email = %admin.email, "created first admin");
        }
    }

    let pool = PgPool::connect(&config.database_url).await?;
    let session_store = PostgresStore::new(pool);
    session_store.migrate().await?;

    let deletion_task = tokio::task::spawn(
        session_store
            .clone()
            .continuously_delete_expired(tokio::time::Duration::from_secs(60)),
    );

    let push = Arc::new(ExpoClient::new(
        config.expo_push_url.clone(),
        config.expo_access_token.clone(),
    ));
    let bind_addr = config.bind_addr;
    let state = AppState::new(db, push, config);
    let app = create_router(state, session_store);

    let listener = TcpListener::bind(bind_addr).await?;
    info!(%bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(deletion_task.abort_handle()))
        .await?;

    // The task ends in cancellation on shutdown; anything else is a real error.
    match deletion_task.await {
        Ok(result) => result?,
        Err(e) if e.is_cancelled() => {}
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
