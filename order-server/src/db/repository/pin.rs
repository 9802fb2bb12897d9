//! PIN Session Repository

use super::{check_response, new_record_id, parse_record_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::Pin;
use crate::utils::time::now_millis;
use shared::models::PinStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "pin";

/// Retire every active session of `$table`, then insert `$id` as the active one.
///
/// The unique indexes on `code` and `active_slot` reject a colliding code
/// and a concurrent open of the same table.
const OPEN_SESSION: &str = r#"
BEGIN TRANSACTION;
UPDATE pin SET status = 'inactive', active_slot = <string>id, closed_at = $now
    WHERE dining_table = $table AND status = 'active';
CREATE $id SET code = $code, dining_table = $table, table_number = $table_number,
    status = 'active', active_slot = $slot, created_at = $now, closed_at = NONE;
COMMIT TRANSACTION;
"#;

#[derive(Clone)]
pub struct PinRepository {
    base: BaseRepository,
}

impl PinRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(TABLE, id)
    }

    /// Open a new active session with `code` for the table
    ///
    /// Fails with [`RepoError::Duplicate`] or [`RepoError::Conflict`] when the
    /// code is taken or another open raced this one; both are retryable.
    pub async fn open(
        &self,
        table: &RecordId,
        table_number: &str,
        code: &str,
    ) -> RepoResult<Pin> {
        let id = new_record_id(TABLE);
        let mut response = self
            .base
            .db()
            .query(OPEN_SESSION)
            .bind(("id", id.clone()))
            .bind(("table", table.clone()))
            .bind(("slot", table.to_string()))
            .bind(("table_number", table_number.to_string()))
            .bind(("code", code.to_string()))
            .bind(("now", now_millis()))
            .await?;
        check_response(&mut response, &[])?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| RepoError::Database(format!("Session {} missing after open", id)))
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Pin>> {
        let pin: Option<Pin> = self.base.db().select(id.clone()).await?;
        Ok(pin)
    }

    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Pin>> {
        let pins: Vec<Pin> = self
            .base
            .db()
            .query("SELECT * FROM pin WHERE code = $code")
            .bind(("code", code.to_string()))
            .await?
            .take(0)?;
        Ok(pins.into_iter().next())
    }

    /// Set a session inactive; already-inactive sessions are returned unchanged
    pub async fn deactivate(&self, id: &RecordId) -> RepoResult<Pin> {
        let mut response = self
            .base
            .db()
            .query(
                "UPDATE $thing SET status = 'inactive', active_slot = <string>id, \
                 closed_at = $now WHERE status = 'active'",
            )
            .bind(("thing", id.clone()))
            .bind(("now", now_millis()))
            .await?;
        check_response(&mut response, &[])?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Session {} not found", id)))
    }

    /// Sessions newest first, optionally by status
    pub async fn find_all(&self, status: Option<PinStatus>) -> RepoResult<Vec<Pin>> {
        let sql = match status {
            Some(_) => "SELECT * FROM pin WHERE status = $status ORDER BY created_at DESC",
            None => "SELECT * FROM pin ORDER BY created_at DESC",
        };
        let pins: Vec<Pin> = self
            .base
            .db()
            .query(sql)
            .bind(("status", status.map(|s| s.as_str())))
            .await?
            .take(0)?;
        Ok(pins)
    }

    /// Active sessions of one table (at most one by construction)
    pub async fn find_active_for_table(&self, table: &RecordId) -> RepoResult<Vec<Pin>> {
        let pins: Vec<Pin> = self
            .base
            .db()
            .query("SELECT * FROM pin WHERE dining_table = $table AND status = 'active'")
            .bind(("table", table.clone()))
            .await?
            .take(0)?;
        Ok(pins)
    }
}
