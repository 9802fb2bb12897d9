//! Dining Table Repository

use super::{check_response, new_record_id, parse_record_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::DiningTable;
use crate::utils::time::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Parse a table id from the API
    pub fn record_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(TABLE, id)
    }

    /// Find all non-deleted tables
    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE is_deleted = false ORDER BY table_number")
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find a table by id, deleted or not
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<DiningTable>> {
        let table: Option<DiningTable> = self.base.db().select(id.clone()).await?;
        Ok(table)
    }

    /// Find a non-deleted table
    pub async fn find_live(&self, id: &RecordId) -> RepoResult<DiningTable> {
        self.find_by_id(id)
            .await?
            .filter(|t| !t.is_deleted)
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }

    /// Create a new dining table; the number must be free among live tables
    pub async fn create(&self, table_number: String) -> RepoResult<DiningTable> {
        let id = new_record_id(TABLE);
        let now = now_millis();
        let mut response = self
            .base
            .db()
            .query(
                "CREATE $id SET table_number = $number, number_slot = $number, \
                 is_deleted = false, created_at = $now, updated_at = $now",
            )
            .bind(("id", id.clone()))
            .bind(("number", table_number.clone()))
            .bind(("now", now))
            .await?;
        check_response(&mut response, &[]).map_err(|e| duplicate_number(e, &table_number))?;

        self.find_live(&id).await
    }

    /// Renumber a live table
    pub async fn update(&self, id: &RecordId, table_number: String) -> RepoResult<DiningTable> {
        let mut response = self
            .base
            .db()
            .query(
                "UPDATE $thing SET table_number = $number, number_slot = $number, \
                 updated_at = $now WHERE is_deleted = false",
            )
            .bind(("thing", id.clone()))
            .bind(("number", table_number.clone()))
            .bind(("now", now_millis()))
            .await?;
        check_response(&mut response, &[]).map_err(|e| duplicate_number(e, &table_number))?;

        let updated: Vec<DiningTable> = response.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }

    /// Soft delete: set the flag and release the number
    pub async fn soft_delete(&self, id: &RecordId) -> RepoResult<DiningTable> {
        let deleted: Vec<DiningTable> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET is_deleted = true, number_slot = <string>id, \
                 updated_at = $now WHERE is_deleted = false",
            )
            .bind(("thing", id.clone()))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        deleted
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }
}

fn duplicate_number(err: RepoError, table_number: &str) -> RepoError {
    match err {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Table number '{}' already exists", table_number))
        }
        other => other,
    }
}
