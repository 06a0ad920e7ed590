use migration::Migrator;
use migration::MigratorTrait;
use post::PostRepository;
use response::{IntoResponse, Response};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

mod active_models;
pub mod post;
mod response;

#[derive(Clone, Debug)]
pub struct Repository {
    pub post: PostRepository,
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(
        "in sea-orm crate from unsuccessful database operations: {}: {}",
        message,
        source
    )]
    InSeaOrmDbErr {
        message: String,
        source: sea_orm::DbErr,
    },

    #[error("title must be present and not empty")]
    MissingTitle,
}

/// Connects to `db_url`, brings the schema up to date and hands back the
/// repositories sharing that connection.
pub async fn init_repository(
    db_url: &str,
    max_connections: u32,
) -> Response<Repository> {
    let db = init_db(db_url, max_connections).await?;

    Ok(Repository {
        post: PostRepository::new(db),
    })
}

async fn init_db(
    db_url: &str,
    max_connections: u32,
) -> Response<DatabaseConnection> {
    let mut opt = ConnectOptions::new(db_url);

    // every connection to an in-memory sqlite database sees its own database
    let max_connections = if db_url.contains(":memory:") {
        1
    } else {
        max_connections.max(1)
    };

    opt.max_connections(max_connections)
        .min_connections(1)
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt)
        .await
        .into_response("in database connect")?;

    Migrator::up(&db, None)
        .await
        .into_response("in migrator up")?;

    info!(db_url, "database ready");

    Ok(db)
}
