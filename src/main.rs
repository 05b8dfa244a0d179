//! Glosa - 公版书逐段批注平台
//!
//! - Domain: book/ (Bounded Context), reorder
//! - Application: commands, queries, ports
//! - Infrastructure: http, persistence, events, seed

use std::sync::Arc;

use glosa::application::{ChapterRepositoryPort, ParagraphRepositoryPort, SeedCatalogHandler};
use glosa::config::{load_config, print_config, AppConfig};
use glosa::infrastructure::events::EventPublisher;
use glosa::infrastructure::http::{
    AppState, HttpServer, IdentityHeaders, Repositories, ServerConfig,
};
use glosa::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteChapterRepository,
    SqliteCommentRepository, SqliteParagraphRepository, SqliteUserRepository,
};
use glosa::infrastructure::seed::load_seed_file;

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},glosa={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Glosa - 公版书逐段批注平台");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let chapters: Arc<dyn ChapterRepositoryPort> =
        Arc::new(SqliteChapterRepository::new(pool.clone()));
    let paragraphs: Arc<dyn ParagraphRepositoryPort> =
        Arc::new(SqliteParagraphRepository::new(pool.clone()));

    // 导入种子数据（仅在没有章节时）
    if let Some(seed_path) = &config.seed.path {
        let catalog = load_seed_file(seed_path).await?;
        let seeded = SeedCatalogHandler::new(chapters.clone())
            .handle(catalog)
            .await?;
        tracing::info!(
            chapters = seeded.chapters_created,
            paragraphs = seeded.paragraphs_created,
            skipped = seeded.skipped,
            "Seed step finished"
        );
    }

    let repos = Repositories {
        chapters,
        paragraphs,
        comments: Arc::new(SqliteCommentRepository::new(pool.clone())),
        users: Arc::new(SqliteUserRepository::new(pool.clone())),
    };

    let identity_headers = IdentityHeaders {
        user_id: config.auth.user_header.clone(),
        user_name: config.auth.name_header.clone(),
        user_image: config.auth.image_header.clone(),
    };

    // 创建 HTTP 服务器
    let state = AppState::new(
        repos,
        EventPublisher::new().arc(),
        identity_headers,
        config.reorder.max_retries,
    );
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}
