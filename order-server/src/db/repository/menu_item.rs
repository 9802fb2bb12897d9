//! Menu Item Repository

use super::{check_response, new_record_id, parse_record_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::MenuItem;
use crate::utils::time::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "menu_item";

/// Full set of writable menu item fields
#[derive(Debug, Clone)]
pub struct MenuItemFields {
    pub name: String,
    pub category: RecordId,
    pub price: f64,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_visible: bool,
}

impl From<MenuItem> for MenuItemFields {
    fn from(item: MenuItem) -> Self {
        Self {
            name: item.name,
            category: item.category,
            price: item.price,
            description: item.description,
            image: item.image,
            is_visible: item.is_visible,
        }
    }
}

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(TABLE, id)
    }

    /// Live menu items, optionally within one category
    pub async fn find_all(
        &self,
        include_hidden: bool,
        category: Option<RecordId>,
    ) -> RepoResult<Vec<MenuItem>> {
        let mut sql = String::from("SELECT * FROM menu_item WHERE is_deleted = false");
        if !include_hidden {
            sql.push_str(" AND is_visible = true");
        }
        if category.is_some() {
            sql.push_str(" AND category = $category");
        }
        sql.push_str(" ORDER BY name");

        let items: Vec<MenuItem> = self
            .base
            .db()
            .query(sql)
            .bind(("category", category))
            .await?
            .take(0)?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<MenuItem>> {
        let item: Option<MenuItem> = self.base.db().select(id.clone()).await?;
        Ok(item)
    }

    /// Find a non-deleted menu item
    pub async fn find_live(&self, id: &RecordId) -> RepoResult<MenuItem> {
        self.find_by_id(id)
            .await?
            .filter(|m| !m.is_deleted)
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    pub async fn create(&self, fields: MenuItemFields) -> RepoResult<MenuItem> {
        let id = new_record_id(TABLE);
        let now = now_millis();
        let mut response = self
            .base
            .db()
            .query(
                "CREATE $id SET name = $name, category = $category, price = $price, \
                 description = $description, image = $image, is_visible = $visible, \
                 is_deleted = false, created_at = $now, updated_at = $now",
            )
            .bind(("id", id.clone()))
            .bind(("name", fields.name))
            .bind(("category", fields.category))
            .bind(("price", fields.price))
            .bind(("description", fields.description))
            .bind(("image", fields.image))
            .bind(("visible", fields.is_visible))
            .bind(("now", now))
            .await?;
        check_response(&mut response, &[])?;

        self.find_live(&id).await
    }

    /// Overwrite every writable field of a live item
    pub async fn update(&self, id: &RecordId, fields: MenuItemFields) -> RepoResult<MenuItem> {
        // 手动构建 UPDATE 语句，避免 category 被序列化为字符串
        let mut response = self
            .base
            .db()
            .query(
                "UPDATE $thing SET name = $name, category = $category, price = $price, \
                 description = $description, image = $image, is_visible = $visible, \
                 updated_at = $now WHERE is_deleted = false",
            )
            .bind(("thing", id.clone()))
            .bind(("name", fields.name))
            .bind(("category", fields.category))
            .bind(("price", fields.price))
            .bind(("description", fields.description))
            .bind(("image", fields.image))
            .bind(("visible", fields.is_visible))
            .bind(("now", now_millis()))
            .await?;
        check_response(&mut response, &[])?;

        let updated: Vec<MenuItem> = response.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    pub async fn set_visibility(&self, id: &RecordId, is_visible: bool) -> RepoResult<MenuItem> {
        let updated: Vec<MenuItem> = self
            .base
            .db()
            .query("UPDATE $thing SET is_visible = $visible, updated_at = $now WHERE is_deleted = false")
            .bind(("thing", id.clone()))
            .bind(("visible", is_visible))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Flip `is_visible`
    pub async fn toggle_visibility(&self, id: &RecordId) -> RepoResult<MenuItem> {
        let updated: Vec<MenuItem> = self
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
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    pub async fn soft_delete(&self, id: &RecordId) -> RepoResult<MenuItem> {
        let deleted: Vec<MenuItem> = self
            .base
            .db()
            .query("UPDATE $thing SET is_deleted = true, updated_at = $now WHERE is_deleted = false")
            .bind(("thing", id.clone()))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        deleted
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }
}
