//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) plus the schema applied at startup.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

pub const NAMESPACE: &str = "qr_order";
pub const DATABASE: &str = "main";

/// Tables are schemaless; the indexes carry the invariants.
///
/// - `*_slot` fields hold the natural key while a row is live and the row's
///   own id otherwise, which turns a plain UNIQUE index into "unique among
///   live rows".
/// - `checkout_pin` allows one checkout per session.
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS dining_table SCHEMALESS;
DEFINE INDEX IF NOT EXISTS dining_table_number_slot ON TABLE dining_table FIELDS number_slot UNIQUE;

DEFINE TABLE IF NOT EXISTS category SCHEMALESS;
DEFINE INDEX IF NOT EXISTS category_name_slot ON TABLE category FIELDS name_slot UNIQUE;

DEFINE TABLE IF NOT EXISTS menu_item SCHEMALESS;
DEFINE INDEX IF NOT EXISTS menu_item_category ON TABLE menu_item FIELDS category;

DEFINE TABLE IF NOT EXISTS pin SCHEMALESS;
DEFINE INDEX IF NOT EXISTS pin_code ON TABLE pin FIELDS code UNIQUE;
DEFINE INDEX IF NOT EXISTS pin_active_slot ON TABLE pin FIELDS active_slot UNIQUE;
DEFINE INDEX IF NOT EXISTS pin_dining_table ON TABLE pin FIELDS dining_table;

DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
DEFINE INDEX IF NOT EXISTS order_pin ON TABLE order FIELDS pin;
DEFINE INDEX IF NOT EXISTS order_status ON TABLE order FIELDS status;

DEFINE TABLE IF NOT EXISTS checkout SCHEMALESS;
DEFINE INDEX IF NOT EXISTS checkout_pin ON TABLE checkout FIELDS pin UNIQUE;
"#;

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `db_path` and apply the schema
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self, AppError> {
        let db_path = db_path.as_ref();
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!(path = %db_path.display(), "Database connection established (SurrealDB RocksDB)");

        apply_schema(&db).await?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }
}

/// Apply `SCHEMA`; every statement is idempotent
pub async fn apply_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(SCHEMA)
        .await
        .and_then(|response| response.check())
        .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
    Ok(())
}
