//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables. Multi-statement writes run
//! inside `BEGIN TRANSACTION … COMMIT TRANSACTION` and report failures through
//! [`check_response`].

// Directory
pub mod category;
pub mod dining_table;
pub mod menu_item;

// Sessions & Orders
pub mod order;
pub mod pin;

// Billing
pub mod checkout;

// Re-exports
pub use category::CategoryRepository;
pub use checkout::CheckoutRepository;
pub use dining_table::DiningTableRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use pin::PinRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Response, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Concurrent transaction touched the same records
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// `THROW "<marker>"` raised by a guarded transaction
    #[error("Aborted: {0}")]
    Aborted(String),
}

impl RepoError {
    /// Classify a SurrealDB error message
    pub fn from_message(msg: String) -> Self {
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else if msg.contains("conflict") || msg.contains("can be retried") {
            RepoError::Conflict(msg)
        } else {
            RepoError::Database(msg)
        }
    }

    /// `true` when an optimistic write can simply be attempted again
    pub fn is_retryable(&self) -> bool {
        matches!(self, RepoError::Duplicate(_) | RepoError::Conflict(_))
    }

    /// `true` when a guarded transaction threw `marker`
    pub fn is_aborted(&self, marker: &str) -> bool {
        matches!(self, RepoError::Aborted(m) if m == marker)
    }
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::from_message(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Inspect every statement of a response and surface the most specific error.
///
/// Inside a failed transaction every statement reports an error, only one of
/// which is the cause. `markers` are the `THROW` values the caller raises;
/// they win over store-level errors, then duplicates, then conflicts.
pub fn check_response(response: &mut Response, markers: &[&str]) -> RepoResult<()> {
    let errors = response.take_errors();
    if errors.is_empty() {
        return Ok(());
    }

    let messages: Vec<String> = errors.into_values().map(|e| e.to_string()).collect();

    for marker in markers {
        if messages.iter().any(|m| m.contains(marker)) {
            return Err(RepoError::Aborted((*marker).to_string()));
        }
    }

    let mut fallback: Option<RepoError> = None;
    for msg in messages {
        let classified = RepoError::from_message(msg);
        fallback = match (fallback, classified) {
            (_, dup @ RepoError::Duplicate(_)) => return Err(dup),
            (Some(RepoError::Conflict(m)), _) => Some(RepoError::Conflict(m)),
            (_, next) => Some(next),
        };
    }

    Err(fallback.unwrap_or_else(|| RepoError::Database("Transaction failed".to_string())))
}

// =============================================================================
// ID Convention: API 统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: parse_record_id("pin", "pin:abc") 或 parse_record_id("pin", "abc")
//   - 创建: new_record_id("pin") (UUID key)
//   - CRUD: db.select(id) / UPDATE $thing 直接使用 RecordId

/// Parse an id given either as `table:key` or as a bare key
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let id = id.trim();
    let key = match id.split_once(':') {
        Some((prefix, key)) if prefix == table => key,
        Some(_) => return Err(RepoError::Validation(format!("Invalid {} ID: {}", table, id))),
        None => id,
    };
    let key = key
        .trim_start_matches(['⟨', '`'])
        .trim_end_matches(['⟩', '`']);
    if key.is_empty() {
        return Err(RepoError::Validation(format!("Invalid {} ID: {}", table, id)));
    }
    Ok(RecordId::from_table_key(table, key))
}

/// Fresh record id with a UUID key
pub fn new_record_id(table: &str) -> RecordId {
    RecordId::from_table_key(table, uuid::Uuid::new_v4().simple().to_string())
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefixed_and_bare_ids() {
        let full = parse_record_id("pin", "pin:abc").unwrap();
        let bare = parse_record_id("pin", "abc").unwrap();
        assert_eq!(full, bare);
        assert_eq!(full.table(), "pin");
        assert_eq!(parse_record_id("pin", "pin:⟨abc⟩").unwrap(), bare);
    }

    #[test]
    fn rejects_foreign_table_prefix() {
        assert!(matches!(
            parse_record_id("pin", "order:abc"),
            Err(RepoError::Validation(_))
        ));
        assert!(parse_record_id("pin", "").is_err());
    }

    #[test]
    fn classifies_store_errors() {
        assert!(matches!(
            RepoError::from_message("Database index `pin_code` already contains 'abc'".into()),
            RepoError::Duplicate(_)
        ));
        assert!(matches!(
            RepoError::from_message(
                "Failed to commit transaction due to a read or write conflict. This transaction can be retried".into()
            ),
            RepoError::Conflict(_)
        ));
        assert!(RepoError::Conflict("x".into()).is_retryable());
        assert!(!RepoError::Database("x".into()).is_retryable());
    }
}
