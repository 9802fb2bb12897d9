use std::path::PathBuf;

use shared::models::OrderWorkflow;

use super::error::{Result, ServerError};
use crate::auth::JwtConfig;

/// PIN 生成参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinConfig {
    /// 码长
    pub length: usize,
    /// 碰撞时最多尝试次数
    pub max_attempts: u32,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            length: 6,
            max_attempts: 10,
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | PIN_LENGTH | 6 | PIN 码长度 |
/// | PIN_MAX_ATTEMPTS | 10 | PIN 生成重试上限 |
/// | ORDER_RATE_LIMIT | 5 | 每窗口每 IP 下单次数 |
/// | ORDER_RATE_WINDOW_SECS | 60 | 限流窗口 (秒) |
/// | ORDER_WORKFLOW | permissive | 订单状态流转: permissive / strict |
/// | CORS_ORIGIN | (任意) | 允许的跨域来源 |
/// | TRUST_PROXY | false | 信任反向代理的 X-Forwarded-For |
///
/// JWT 相关见 [`JwtConfig::from_env`]。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/qr HTTP_PORT=8080 ORDER_WORKFLOW=strict cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | production
    pub environment: String,
    pub log_level: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    pub pin: PinConfig,
    pub order_rate_limit: u32,
    pub order_rate_window_secs: u64,
    pub order_workflow: OrderWorkflow,
    /// `None` allows any origin
    pub cors_origin: Option<String>,
    /// 信任反向代理的 X-Forwarded-For，否则按对端地址限流
    pub trust_proxy: bool,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Result<Self> {
        let order_workflow = match std::env::var("ORDER_WORKFLOW") {
            Ok(value) => value
                .parse()
                .map_err(|e| ServerError::Config(format!("ORDER_WORKFLOW: {e}")))?,
            Err(_) => OrderWorkflow::default(),
        };

        let defaults = PinConfig::default();
        let pin = PinConfig {
            length: env_or("PIN_LENGTH", defaults.length),
            max_attempts: env_or("PIN_MAX_ATTEMPTS", defaults.max_attempts),
        };
        if pin.length == 0 || pin.max_attempts == 0 {
            return Err(ServerError::Config(
                "PIN_LENGTH and PIN_MAX_ATTEMPTS must be positive".to_string(),
            ));
        }

        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_or("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            jwt: JwtConfig::from_env()?,
            pin,
            order_rate_limit: env_or("ORDER_RATE_LIMIT", 5),
            order_rate_window_secs: env_or("ORDER_RATE_WINDOW_SECS", 60),
            order_workflow,
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|s| !s.is_empty()),
            trust_proxy: env_or("TRUST_PROXY", false),
        })
    }

    /// Configuration for tests: defaults everywhere, given work dir and secret
    pub fn for_work_dir(work_dir: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port: 0,
            environment: "development".into(),
            log_level: "info".into(),
            jwt: JwtConfig::with_secret(jwt_secret),
            pin: PinConfig::default(),
            order_rate_limit: 5,
            order_rate_window_secs: 60,
            order_workflow: OrderWorkflow::default(),
            cors_origin: None,
            trust_proxy: false,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 数据库目录: work_dir/database/orders.db
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database").join("orders.db")
    }

    /// 日志目录: work_dir/logs
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(PathBuf::from(&self.work_dir).join("database"))?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}
