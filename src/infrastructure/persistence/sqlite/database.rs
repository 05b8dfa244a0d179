//! SQLite Database - 数据库连接和迁移

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;

use crate::application::ports::RepositoryError;

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    pub database_url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./data/glosa.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: format!("sqlite:{}?mode=rwc", path.as_ref().display()),
            max_connections: 5,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }
}

/// 数据库连接池
pub type DbPool = Pool<Sqlite>;

/// 创建数据库连接池
///
/// sqlx 默认为每个 SQLite 连接开启 foreign_keys，评论与段落之间的外键约束因此生效。
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    // 启用 WAL 模式，读事务看到的是一致快照
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await?;

    // 设置 busy_timeout=5000ms，并发写入时排队等待写锁而不是立即失败
    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await?;

    // 设置同步模式为 NORMAL（平衡性能和安全性）
    sqlx::query("PRAGMA synchronous=NORMAL")
        .execute(&pool)
        .await?;

    tracing::info!("SQLite pool created with WAL mode and busy_timeout=5000ms");

    Ok(pool)
}

/// 运行数据库迁移
///
/// 外键不带 ON DELETE CASCADE：删除段落时由仓储显式先删评论。
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    // 创建 chapters 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chapters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 创建 paragraphs 表，(chapter_id, sort_order) 唯一
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS paragraphs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            chapter_id INTEGER NOT NULL,
            content TEXT NOT NULL,
            sort_order INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (chapter_id) REFERENCES chapters(id),
            UNIQUE (chapter_id, sort_order)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 创建 users 表（认证服务的用户资料镜像）
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT,
            image TEXT,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 创建 comments 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            paragraph_id INTEGER NOT NULL,
            user_id TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (paragraph_id) REFERENCES paragraphs(id),
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 索引: comments.paragraph_id (用于级联删除和聚合读取)
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_comments_paragraph_id
        ON comments(paragraph_id)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed");
    Ok(())
}

/// 将 sqlx 错误映射为仓储错误
///
/// 唯一约束冲突视为并发修改，外键冲突视为引用的记录不存在。
pub(crate) fn map_db_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(db_err.message().to_string());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::NotFound(format!(
                "referenced row does not exist ({})",
                db_err.message()
            ));
        }
    }
    RepositoryError::DatabaseError(err.to_string())
}

/// 解析 RFC 3339 时间戳
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_in_memory_db() {
        let config = DatabaseConfig::in_memory();
        let pool = create_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        // 迁移可重复执行
        run_migrations(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let err = sqlx::query(
            "INSERT INTO paragraphs (chapter_id, content, sort_order, created_at, updated_at) VALUES (999, 'x', 0, '', '')",
        )
        .execute(&pool)
        .await
        .map_err(map_db_error)
        .unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2024-05-01T10:00:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T08:00:00+00:00");
        assert!(parse_timestamp("yesterday").is_err());
    }
}
