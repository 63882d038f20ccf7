/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | DATABASE_PATH | order-system.db | SQLite 数据库文件 |
/// | FRONTEND_URL | http://localhost:5000 | 客户端页面地址 (customerUrl 派生用) |
/// | ENVIRONMENT | development | 运行环境 |
/// | STATUS_POLICY | permissive | 订单状态机策略: permissive \| forward-only |
/// | CASCADE_EVENTS | false | 删除 session 时是否级联删除事件 |
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API + WebSocket 服务端口
    pub http_port: u16,
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// 前端基础 URL，用于派生 session 的 customerUrl
    pub frontend_url: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 订单状态转换策略
    pub status_policy: StatusPolicy,
    /// 删除 session 时是否级联删除其事件 (默认保留)
    pub cascade_events: bool,
}

/// Order status transition policy
///
/// `Permissive` reproduces the historical behavior: any status may be
/// set to any other at any time, including reopening a completed or
/// cancelled order. `ForwardOnly` enforces the transition table on
/// `OrderStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    #[default]
    Permissive,
    ForwardOnly,
}

impl StatusPolicy {
    fn parse(s: &str) -> Self {
        match s {
            "forward-only" | "forward_only" => StatusPolicy::ForwardOnly,
            _ => StatusPolicy::Permissive,
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置时使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "order-system.db".into()),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5000".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            status_policy: std::env::var("STATUS_POLICY")
                .map(|s| StatusPolicy::parse(&s))
                .unwrap_or_default(),
            cascade_events: std::env::var("CASCADE_EVENTS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 5000,
            database_path: "order-system.db".into(),
            frontend_url: "http://localhost:5000".into(),
            environment: "development".into(),
            status_policy: StatusPolicy::default(),
            cascade_events: false,
        }
    }
}
