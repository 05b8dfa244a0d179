//! 测试辅助：内存数据库与样例数据

use super::{
    create_pool, run_migrations, DatabaseConfig, DbPool, SqliteChapterRepository,
    SqliteCommentRepository, SqliteParagraphRepository, SqliteUserRepository,
};
use crate::application::ports::{
    ChapterRepositoryPort, CommentRepositoryPort, NewComment, ParagraphRepositoryPort, UserRecord,
    UserRepositoryPort,
};
use crate::domain::book::{ChapterId, ParagraphId};

/// 已迁移的内存数据库
pub async fn memory_pool() -> DbPool {
    let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

/// 新建章节并按顺序追加段落
pub async fn chapter_with_paragraphs(
    pool: &DbPool,
    title: &str,
    contents: &[&str],
) -> (ChapterId, Vec<ParagraphId>) {
    let chapter = SqliteChapterRepository::new(pool.clone())
        .save(title)
        .await
        .unwrap();

    let paragraphs = SqliteParagraphRepository::new(pool.clone());
    let mut ids = Vec::with_capacity(contents.len());
    for content in contents {
        let record = paragraphs.insert_at_end(chapter.id, content).await.unwrap();
        ids.push(record.id);
    }

    (chapter.id, ids)
}

/// 以用户 `user_id`（显示名 "Lector {user_id}"）发表评论
pub async fn add_comment(pool: &DbPool, paragraph_id: ParagraphId, user_id: &str, content: &str) {
    SqliteUserRepository::new(pool.clone())
        .upsert(&UserRecord {
            id: user_id.to_string(),
            name: Some(format!("Lector {}", user_id)),
            image: None,
        })
        .await
        .unwrap();

    SqliteCommentRepository::new(pool.clone())
        .save(&NewComment {
            paragraph_id,
            user_id: user_id.to_string(),
            content: content.to_string(),
        })
        .await
        .unwrap();
}
