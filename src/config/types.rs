//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 段落重排配置
    #[serde(default)]
    pub reorder: ReorderConfig,

    /// 身份请求头配置
    #[serde(default)]
    pub auth: AuthConfig,

    /// 种子数据配置
    #[serde(default)]
    pub seed: SeedConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/glosa.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 段落重排配置
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderConfig {
    /// 交换冲突后的最大重试次数
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_max_retries() -> u32 {
    3
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
        }
    }
}

/// 身份请求头配置（由上游认证网关写入）
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// 用户 ID 请求头（必需）
    #[serde(default = "default_user_header")]
    pub user_header: String,

    /// 用户显示名请求头
    #[serde(default = "default_name_header")]
    pub name_header: String,

    /// 用户头像请求头
    #[serde(default = "default_image_header")]
    pub image_header: String,
}

fn default_user_header() -> String {
    "x-user-id".to_string()
}

fn default_name_header() -> String {
    "x-user-name".to_string()
}

fn default_image_header() -> String {
    "x-user-image".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_header: default_user_header(),
            name_header: default_name_header(),
            image_header: default_image_header(),
        }
    }
}

/// 种子数据配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    /// 种子 TOML 文件，未设置时不导入
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
