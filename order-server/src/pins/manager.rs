//! PIN Session Manager

use shared::models::PinStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::{debug, info, warn};

use super::code::CodeGenerator;
use super::error::PinError;
use super::retry::{RetryError, retry_bounded};
use crate::auth::{Capability, CurrentUser};
use crate::core::config::PinConfig;
use crate::db::models::Pin;
use crate::db::repository::{DiningTableRepository, PinRepository, RepoError};

/// Issues and retires per-table dining sessions
#[derive(Clone)]
pub struct PinManager {
    tables: DiningTableRepository,
    pins: PinRepository,
    generator: CodeGenerator,
    max_attempts: u32,
}

impl PinManager {
    pub fn new(db: Surreal<Db>, config: PinConfig) -> Self {
        Self::with_generator(db, CodeGenerator::with_length(config.length), config.max_attempts)
    }

    pub fn with_generator(db: Surreal<Db>, generator: CodeGenerator, max_attempts: u32) -> Self {
        Self {
            tables: DiningTableRepository::new(db.clone()),
            pins: PinRepository::new(db),
            generator,
            max_attempts,
        }
    }

    /// Open a table: retire its active session and issue a fresh code
    pub async fn open_table(&self, actor: &CurrentUser, table_id: &str) -> Result<Pin, PinError> {
        actor.require(Capability::OpenTable)?;

        let table_rid = DiningTableRepository::record_id(table_id)?;
        let table = self
            .tables
            .find_live(&table_rid)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => PinError::TableNotFound(table_id.to_string()),
                other => PinError::Repo(other),
            })?;

        let pin = retry_bounded(self.max_attempts, RepoError::is_retryable, |attempt| {
            let code = self.generator.generate();
            let pins = &self.pins;
            let table_rid = &table_rid;
            let table_number = table.table_number.as_str();
            async move {
                if attempt > 1 {
                    debug!(table = %table_number, attempt, "Retrying PIN generation");
                }
                pins.open(table_rid, table_number, &code).await
            }
        })
        .await
        .map_err(|e| match e {
            RetryError::Exhausted { attempts, last } => {
                warn!(table = %table.table_number, attempts, error = %last, "PIN generation exhausted");
                PinError::ExhaustedRetries(attempts)
            }
            RetryError::Fatal(e) => PinError::Repo(e),
        })?;

        info!(
            table = %pin.table_number,
            pin_id = ?pin.id,
            opened_by = %actor.username,
            "Table opened"
        );
        Ok(pin)
    }

    /// Resolve a customer code; only active sessions are visible
    pub async fn lookup_by_code(&self, code: &str) -> Result<Pin, PinError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(PinError::NotActive);
        }
        self.pins
            .find_by_code(code)
            .await?
            .filter(Pin::is_active)
            .ok_or(PinError::NotActive)
    }

    /// Resolve a session id to an active session
    pub async fn active_session(&self, pin_id: &str) -> Result<Pin, PinError> {
        let rid = PinRepository::record_id(pin_id).map_err(|_| PinError::NotActive)?;
        self.pins
            .find_by_id(&rid)
            .await?
            .filter(Pin::is_active)
            .ok_or(PinError::NotActive)
    }

    /// Staff close the table without billing
    pub async fn close_session(&self, actor: &CurrentUser, pin_id: &str) -> Result<Pin, PinError> {
        actor.require(Capability::CloseSession)?;
        self.deactivate(actor, pin_id, "closed").await
    }

    /// Staff record payment outside the checkout flow
    pub async fn mark_paid(&self, actor: &CurrentUser, pin_id: &str) -> Result<Pin, PinError> {
        actor.require(Capability::MarkPaid)?;
        self.deactivate(actor, pin_id, "paid").await
    }

    async fn deactivate(
        &self,
        actor: &CurrentUser,
        pin_id: &str,
        reason: &'static str,
    ) -> Result<Pin, PinError> {
        let rid = PinRepository::record_id(pin_id)?;
        let pin = self.pins.deactivate(&rid).await.map_err(|e| match e {
            RepoError::NotFound(_) => PinError::SessionNotFound(pin_id.to_string()),
            other => PinError::Repo(other),
        })?;

        info!(
            pin_id = %rid,
            table = %pin.table_number,
            reason,
            by = %actor.username,
            "Session deactivated"
        );
        Ok(pin)
    }

    /// Active sessions for the staff dashboard
    pub async fn list_active(&self, actor: &CurrentUser) -> Result<Vec<Pin>, PinError> {
        actor.require(Capability::ListSessions)?;
        Ok(self.pins.find_all(Some(PinStatus::Active)).await?)
    }

    /// All sessions, newest first
    pub async fn list_sessions(
        &self,
        actor: &CurrentUser,
        status: Option<&str>,
    ) -> Result<Vec<Pin>, PinError> {
        actor.require(Capability::ListSessions)?;
        let status = status
            .filter(|s| !s.is_empty())
            .map(str::parse::<PinStatus>)
            .transpose()?;
        Ok(self.pins.find_all(status).await?)
    }
}
