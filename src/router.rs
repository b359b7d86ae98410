use std::sync::Arc;

use axum::{Router, routing::get_service};
use axum_login::{
    AuthManagerLayerBuilder,
    tower_sessions::{
        Expiry, SessionManagerLayer, SessionStore,
        cookie::{SameSite, time},
    },
};
use minijinja::Environment;
use sea_orm::DatabaseConnection;
use tokio::{signal, task::AbortHandle};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    auth::{router as auth_router, user::Backend},
    config::Config,
    push::PushSender,
    routes,
    util::asset_loader::AssetLoader,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub push: Arc<dyn PushSender>,
    pub templates: Arc<Environment<'static>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, push: Arc<dyn PushSender>, config: Config) -> Self {
        Self {
            db,
            push,
            templates: Arc::new(setup_templates()),
            config: Arc::new(config),
        }
    }
}

pub fn create_router<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(state.config.session_secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(7)));

    // Auth service.
    //
    // This combines the session layer with our backend to establish the auth
    // service which will provide the auth session as a request extension.
    let backend = Backend::new(state.db.clone());
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_layer).build();

    let uploads = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .merge(routes::dashboard::routes())
        .nest("/api", routes::api())
        .merge(auth_router::router())
        .with_state(state)
        .nest_service("/static", get_service(ServeDir::new("static")))
        .nest_service("/uploads", get_service(uploads))
        .layer(auth_layer)
        .layer(TraceLayer::new_for_http())
}

fn setup_templates() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_loader(minijinja::path_loader("templates"));
    AssetLoader::new("static").register(&mut env);
    env
}

pub async fn shutdown_signal(deletion_task_abort_handle: AbortHandle) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down");
    deletion_task_abort_handle.abort();
}
