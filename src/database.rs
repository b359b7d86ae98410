use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Connects and brings the schema up to date.
pub async fn setup_database(db_url: &str) -> Result<DatabaseConnection, sea_orm::DbErr> {
    let mut options = ConnectOptions::new(db_url);
    options.sqlx_logging(false);
    // An in-memory SQLite database lives only as long as its one connection.
    if db_url.starts_with("sqlite::memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    info!("database ready");

    Ok(db)
}
