//! Glosa - 公版书逐段批注平台
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book Context: 章节、段落、评论
//! - Reorder: 段落上移/下移规划
//!
//! 应用层 (application/):
//! - Ports: 仓储端口（Chapter, Paragraph, Comment, User）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Persistence: SQLite 存储
//! - Events: 章节变更事件发布
//! - Seed: TOML 种子数据

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
