//! Process-wide connection cache
//!
//! The first caller connects and ensures indexes; every later caller gets a
//! clone of the same `Database` handle. A failed connect leaves the cell
//! empty so the next request retries.

use bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};
use tokio::sync::OnceCell;

use super::documents::{BlogDocument, EventDocument, MemberDocument, BLOGS, EVENTS, MEMBERS};
use super::store::DbError;

const DEFAULT_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "clubhub";

static DATABASE: OnceCell<Database> = OnceCell::const_new();

/// Where to find the document database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub uri: String,
    pub database: String,
}

impl DatabaseConfig {
    /// Load from `MONGODB_URI` and `MONGODB_DATABASE`.
    pub fn from_env() -> Self {
        Self {
            uri: std::env::var("MONGODB_URI").unwrap_or_else(|_| DEFAULT_URI.to_string()),
            database: std::env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

/// Get the cached database handle, connecting on first use.
///
/// The config of the first successful call wins for the life of the process.
pub async fn cached_database(config: &DatabaseConfig) -> Result<Database, DbError> {
    let db = DATABASE
        .get_or_try_init(|| async {
            let client = Client::with_uri_str(&config.uri).await?;
            let db = client.database(&config.database);
            ensure_indexes(&db).await?;
            tracing::info!(database = %config.database, "database connection established");
            Ok::<_, DbError>(db)
        })
        .await?;
    Ok(db.clone())
}

/// Whether a connection has been cached yet.
#[cfg(test)]
pub(crate) fn is_connected() -> bool {
    DATABASE.initialized()
}

async fn ensure_indexes(db: &Database) -> Result<(), DbError> {
    db.collection::<MemberDocument>(MEMBERS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;

    db.collection::<BlogDocument>(BLOGS)
        .create_index(IndexModel::builder().keys(doc! { "authorId": 1 }).build())
        .await?;

    db.collection::<EventDocument>(EVENTS)
        .create_index(IndexModel::builder().keys(doc! { "eventDate": 1 }).build())
        .await?;

    Ok(())
}
