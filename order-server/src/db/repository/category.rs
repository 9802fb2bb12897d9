//! Category Repository

use super::{check_response, new_record_id, parse_record_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::Category;
use crate::utils::time::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(TABLE, id)
    }

    /// Live categories, hidden ones only when asked
    pub async fn find_all(&self, include_hidden: bool) -> RepoResult<Vec<Category>> {
        let sql = if include_hidden {
            "SELECT * FROM category WHERE is_deleted = false ORDER BY name"
        } else {
            "SELECT * FROM category WHERE is_deleted = false AND is_visible = true ORDER BY name"
        };
        let categories: Vec<Category> = self.base.db().query(sql).await?.take(0)?;
        Ok(categories)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Category>> {
        let category: Option<Category> = self.base.db().select(id.clone()).await?;
        Ok(category)
    }

    /// Find a non-deleted category
    pub async fn find_live(&self, id: &RecordId) -> RepoResult<Category> {
        self.find_by_id(id)
            .await?
            .filter(|c| !c.is_deleted)
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn create(&self, name: String, is_visible: bool) -> RepoResult<Category> {
        let id = new_record_id(TABLE);
        let now = now_millis();
        let mut response = self
            .base
            .db()
            .query(
                "CREATE $id SET name = $name, name_slot = $name, is_visible = $visible, \
                 is_deleted = false, created_at = $now, updated_at = $now",
            )
            .bind(("id", id.clone()))
            .bind(("name", name.clone()))
            .bind(("visible", is_visible))
            .bind(("now", now))
            .await?;
        check_response(&mut response, &[]).map_err(|e| duplicate_name(e, &name))?;

        self.find_live(&id).await
    }

    pub async fn update(&self, id: &RecordId, name: String, is_visible: bool) -> RepoResult<Category> {
        let mut response = self
            .base
            .db()
            .query(
                "UPDATE $thing SET name = $name, name_slot = $name, is_visible = $visible, \
                 updated_at = $now WHERE is_deleted = false",
            )
            .bind(("thing", id.clone()))
            .bind(("name", name.clone()))
            .bind(("visible", is_visible))
            .bind(("now", now_millis()))
            .await?;
        check_response(&mut response, &[]).map_err(|e| duplicate_name(e, &name))?;

        let updated: Vec<Category> = response.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Flip `is_visible`
    pub async fn toggle_visibility(&self, id: &RecordId) -> RepoResult<Category> {
        let updated: Vec<Category> = self
            .base
            .db()
            .query("UPDATE $thing SET is_visible = !is_visible, updated_at = $now WHERE is_deleted = false")
            .bind(("thing", id.clone()))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Soft delete: set the flag and release the name
    pub async fn soft_delete(&self, id: &RecordId) -> RepoResult<Category> {
        let deleted: Vec<Category> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET is_deleted = true, name_slot = <string>id, \
                 updated_at = $now WHERE is_deleted = false",
            )
            .bind(("thing", id.clone()))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        deleted
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }
}

fn duplicate_name(err: RepoError, name: &str) -> RepoError {
    match err {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Category '{}' already exists", name))
        }
        other => other,
    }
}
