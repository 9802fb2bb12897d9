//! 集成测试公共设施: 临时目录里的嵌入式数据库 + 完整 ServerState

#![allow(dead_code)]

use order_server::auth::CurrentUser;
use order_server::db::models::{DiningTable, MenuItem, Pin};
use order_server::db::repository::menu_item::MenuItemFields;
use order_server::db::repository::{CategoryRepository, DiningTableRepository, MenuItemRepository};
use order_server::{Config, ServerState};
use shared::models::{OrderItemInput, PlaceOrderRequest, Role};
use surrealdb::RecordId;
use tempfile::TempDir;

pub const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub struct TestEnv {
    // 保持临时目录存活直到测试结束
    _dir: TempDir,
    pub config: Config,
    pub state: ServerState,
}

pub async fn setup() -> TestEnv {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_work_dir(dir.path().to_string_lossy(), JWT_SECRET);
    let state = ServerState::initialize(&config).await.unwrap();
    TestEnv {
        _dir: dir,
        config,
        state,
    }
}

pub fn employee() -> CurrentUser {
    CurrentUser::new("employee:mai", "mai", Role::Employee)
}

pub fn admin() -> CurrentUser {
    CurrentUser::new("admin:root", "root", Role::Admin)
}

pub fn rid_string(id: &Option<RecordId>) -> String {
    id.as_ref().unwrap().to_string()
}

impl TestEnv {
    pub async fn table(&self, number: &str) -> DiningTable {
        DiningTableRepository::new(self.state.get_db())
            .create(number.to_string())
            .await
            .unwrap()
    }

    pub async fn category(&self, name: &str) -> RecordId {
        CategoryRepository::new(self.state.get_db())
            .create(name.to_string(), true)
            .await
            .unwrap()
            .id
            .unwrap()
    }

    pub async fn menu_item(&self, category: &RecordId, name: &str, price: f64) -> MenuItem {
        MenuItemRepository::new(self.state.get_db())
            .create(MenuItemFields {
                name: name.to_string(),
                category: category.clone(),
                price,
                description: None,
                image: None,
                is_visible: true,
            })
            .await
            .unwrap()
    }

    /// Table + active session in one step
    pub async fn open(&self, number: &str) -> Pin {
        let table = self.table(number).await;
        self.state
            .pins
            .open_table(&employee(), &rid_string(&table.id))
            .await
            .unwrap()
    }
}

pub fn line(item: &MenuItem, quantity: i64) -> OrderItemInput {
    OrderItemInput {
        menu_item_id: rid_string(&item.id),
        quantity,
        note: None,
    }
}

pub fn request(pin: &Pin, items: Vec<OrderItemInput>) -> PlaceOrderRequest {
    PlaceOrderRequest {
        pin: pin.code.clone(),
        items,
    }
}
