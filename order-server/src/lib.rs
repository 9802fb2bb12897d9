//! QR Order Server - 扫码点餐后端
//!
//! # 架构概述
//!
//! - **PIN 会话** (`pins`): 开台生成 PIN，每桌最多一个 active 会话
//! - **订单账本** (`orders`): 顾客凭 PIN 下单，员工推进状态
//! - **结账** (`checkout`): 汇总已完成订单，写入结账单并关闭会话
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT 验证 + 能力表
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、权限、限流
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 工具函数
//! ├── db/            # 数据库层
//! ├── message/       # 通知总线
//! ├── pins/          # PIN 会话
//! ├── orders/        # 订单账本
//! └── checkout/      # 结账
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod message;
pub mod orders;
pub mod pins;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use checkout::CheckoutAggregator;
pub use core::{Config, Server, ServerState};
pub use message::{MessageBus, NotificationSink};
pub use orders::OrderLedger;
pub use pins::PinManager;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 .env，初始化日志
///
/// Logs go to `WORK_DIR/logs` when that directory exists, stdout otherwise.
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
    let log_dir = std::path::Path::new(&work_dir).join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.to_str());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  ____  ____     ___          _
 / __ \|  _ \   / _ \ _ __ __| | ___ _ __
| |  | | |_) | | | | | '__/ _` |/ _ \ '__|
| |__| |  _ <  | |_| | | | (_| |  __/ |
 \___\_\_| \_\  \___/|_|  \__,_|\___|_|
    "#
    );
}
