//! PIN Session Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::PinStatus;
use surrealdb::RecordId;

/// One dining session at a table
///
/// `active_slot` (stored, not exposed) holds the table id while the session is
/// active and the session's own id afterwards. Its unique index keeps at most
/// one active session per table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub code: String,
    #[serde(with = "serde_helpers::record_id")]
    pub dining_table: RecordId,
    /// Denormalized at open time
    pub table_number: String,
    pub status: PinStatus,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub closed_at: Option<i64>,
}

impl Pin {
    pub fn is_active(&self) -> bool {
        self.status == PinStatus::Active
    }
}
