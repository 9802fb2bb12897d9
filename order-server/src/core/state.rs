use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{JwtService, RateLimiter};
use crate::checkout::CheckoutAggregator;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::message::MessageBus;
use crate::orders::OrderLedger;
use crate::pins::PinManager;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是廉价克隆 (Arc / 数据库句柄)，每个请求拿到一份拷贝。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 |
/// | message_bus | 订单通知广播 |
/// | jwt_service | JWT 验证 |
/// | rate_limiter | 下单限流 |
/// | pins / orders / checkout | 三个核心组件 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub message_bus: Arc<MessageBus>,
    pub jwt_service: Arc<JwtService>,
    pub rate_limiter: RateLimiter,
    pub pins: PinManager,
    pub orders: OrderLedger,
    pub checkout: CheckoutAggregator,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/orders.db) + schema
    /// 3. 各服务
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_service = DbService::new(config.database_path()).await?;
        Ok(Self::from_db(config.clone(), db_service.db))
    }

    /// Wire every service on top of an open database
    pub fn from_db(config: Config, db: Surreal<Db>) -> Self {
        let message_bus = Arc::new(MessageBus::new());
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let rate_limiter = RateLimiter::new(config.order_rate_limit, config.order_rate_window_secs);

        let pins = PinManager::new(db.clone(), config.pin);
        let orders = OrderLedger::new(db.clone(), message_bus.clone(), config.order_workflow);
        let checkout = CheckoutAggregator::new(db.clone());

        Self {
            config,
            db,
            message_bus,
            jwt_service,
            rate_limiter,
            pins,
            orders,
            checkout,
        }
    }

    /// Replace the PIN manager (custom generator in tests)
    pub fn with_pins(mut self, pins: PinManager) -> Self {
        self.pins = pins;
        self
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn message_bus(&self) -> &MessageBus {
        &self.message_bus
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
