//! SQLite Paragraph Repository

use async_trait::async_trait;
use chrono::Utc;

use super::database::map_db_error;
use super::rows::ParagraphRow;
use super::DbPool;
use crate::application::ports::{
    DeletedParagraph, ParagraphRecord, ParagraphRepositoryPort, RepositoryError,
};
use crate::domain::book::{ChapterId, ParagraphId};
use crate::domain::OrderSlot;

/// SQLite Paragraph Repository
pub struct SqliteParagraphRepository {
    pool: DbPool,
}

impl SqliteParagraphRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParagraphRepositoryPort for SqliteParagraphRepository {
    async fn find_by_id(&self, id: ParagraphId) -> Result<Option<ParagraphRecord>, RepositoryError> {
        let row: Option<ParagraphRow> = sqlx::query_as(
            "SELECT id, chapter_id, content, sort_order, created_at, updated_at FROM paragraphs WHERE id = ?",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(ParagraphRecord::try_from).transpose()
    }

    async fn list_ordered(
        &self,
        chapter_id: ChapterId,
    ) -> Result<Vec<ParagraphRecord>, RepositoryError> {
        let rows: Vec<ParagraphRow> = sqlx::query_as(
            "SELECT id, chapter_id, content, sort_order, created_at, updated_at FROM paragraphs WHERE chapter_id = ? ORDER BY sort_order ASC",
        )
        .bind(chapter_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(ParagraphRecord::try_from).collect()
    }

    async fn insert_at_end(
        &self,
        chapter_id: ChapterId,
        content: &str,
    ) -> Result<ParagraphRecord, RepositoryError> {
        let now = Utc::now().to_rfc3339();

        // 在同一条语句里计算 MAX(sort_order)，并发新增不会拿到相同的顺序值
        let row: ParagraphRow = sqlx::query_as(
            r#"
            INSERT INTO paragraphs (chapter_id, content, sort_order, created_at, updated_at)
            SELECT ?, ?, COALESCE(MAX(sort_order), -1) + 1, ?, ?
            FROM paragraphs WHERE chapter_id = ?
            RETURNING id, chapter_id, content, sort_order, created_at, updated_at
            "#,
        )
        .bind(chapter_id.value())
        .bind(content)
        .bind(&now)
        .bind(&now)
        .bind(chapter_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        ParagraphRecord::try_from(row)
    }

    async fn update_content(
        &self,
        id: ParagraphId,
        content: &str,
    ) -> Result<Option<ParagraphRecord>, RepositoryError> {
        let row: Option<ParagraphRow> = sqlx::query_as(
            r#"
            UPDATE paragraphs
            SET content = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, chapter_id, content, sort_order, created_at, updated_at
            "#,
        )
        .bind(content)
        .bind(Utc::now().to_rfc3339())
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(ParagraphRecord::try_from).transpose()
    }

    async fn swap_order(
        &self,
        chapter_id: ChapterId,
        moving: OrderSlot,
        neighbour: OrderSlot,
    ) -> Result<(), RepositoryError> {
        // 未提交的事务在 drop 时自动回滚
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // 1. 先把移动中的段落停放到负数位置，避开 (chapter_id, sort_order) 唯一索引。
        //    静止状态下 sort_order 总是 >= 0。
        let parked = -1 - moving.order;
        let parked_rows = sqlx::query(
            "UPDATE paragraphs SET sort_order = ? WHERE id = ? AND chapter_id = ? AND sort_order = ?",
        )
        .bind(parked)
        .bind(moving.paragraph_id.value())
        .bind(chapter_id.value())
        .bind(moving.order)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if parked_rows != 1 {
            return Err(RepositoryError::Conflict(format!(
                "paragraph {} is no longer at order {}",
                moving.paragraph_id, moving.order
            )));
        }

        // 2. 相邻段落占用移动段落原来的位置
        let neighbour_rows = sqlx::query(
            "UPDATE paragraphs SET sort_order = ? WHERE id = ? AND chapter_id = ? AND sort_order = ?",
        )
        .bind(moving.order)
        .bind(neighbour.paragraph_id.value())
        .bind(chapter_id.value())
        .bind(neighbour.order)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if neighbour_rows != 1 {
            return Err(RepositoryError::Conflict(format!(
                "paragraph {} is no longer at order {}",
                neighbour.paragraph_id, neighbour.order
            )));
        }

        // 3. 移动段落落到相邻段落原来的位置
        let landed_rows =
            sqlx::query("UPDATE paragraphs SET sort_order = ? WHERE id = ? AND sort_order = ?")
                .bind(neighbour.order)
                .bind(moving.paragraph_id.value())
                .bind(parked)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?
                .rows_affected();

        if landed_rows != 1 {
            return Err(RepositoryError::Conflict(format!(
                "paragraph {} left its parked order {}",
                moving.paragraph_id, parked
            )));
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    async fn delete_cascade(
        &self,
        id: ParagraphId,
    ) -> Result<Option<DeletedParagraph>, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // 先删除关联的 comments
        let comments_removed = sqlx::query("DELETE FROM comments WHERE paragraph_id = ?")
            .bind(id.value())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        // 再删除 paragraph
        let row: Option<ParagraphRow> = sqlx::query_as(
            "DELETE FROM paragraphs WHERE id = ? RETURNING id, chapter_id, content, sort_order, created_at, updated_at",
        )
        .bind(id.value())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        tx.commit().await.map_err(map_db_error)?;

        Ok(Some(DeletedParagraph {
            paragraph: ParagraphRecord::try_from(row)?,
            comments_removed: comments_removed as usize,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::testing::{
        add_comment, chapter_with_paragraphs, memory_pool,
    };

    fn orders(records: &[ParagraphRecord]) -> Vec<i64> {
        records.iter().map(|p| p.order).collect()
    }

    fn ids(records: &[ParagraphRecord]) -> Vec<ParagraphId> {
        records.iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn test_insert_appends_after_max_order() {
        let pool = memory_pool().await;
        let (chapter_id, _) = chapter_with_paragraphs(&pool, "I", &["a", "b", "c"]).await;
        let repo = SqliteParagraphRepository::new(pool);

        let before = repo.list_ordered(chapter_id).await.unwrap();
        assert_eq!(orders(&before), vec![0, 1, 2]);

        let created = repo.insert_at_end(chapter_id, "d").await.unwrap();
        assert_eq!(created.order, 3);
        assert_eq!(created.chapter_id, chapter_id);

        let after = repo.list_ordered(chapter_id).await.unwrap();
        assert_eq!(orders(&after), vec![0, 1, 2, 3]);
        assert_eq!(&after[..3], &before[..]);
    }

    #[tokio::test]
    async fn test_first_paragraph_gets_order_zero() {
        let pool = memory_pool().await;
        let (chapter_id, _) = chapter_with_paragraphs(&pool, "vacío", &[]).await;
        let repo = SqliteParagraphRepository::new(pool);

        let created = repo.insert_at_end(chapter_id, "primero").await.unwrap();
        assert_eq!(created.order, 0);
    }

    #[tokio::test]
    async fn test_insert_into_missing_chapter_fails() {
        let pool = memory_pool().await;
        let repo = SqliteParagraphRepository::new(pool);

        let err = repo
            .insert_at_end(ChapterId::new(404), "huérfano")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_content_keeps_order_and_chapter() {
        let pool = memory_pool().await;
        let (chapter_id, paragraphs) = chapter_with_paragraphs(&pool, "I", &["a", "b"]).await;
        let repo = SqliteParagraphRepository::new(pool);

        let updated = repo
            .update_content(paragraphs[1], "nuevo texto")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.content, "nuevo texto");
        assert_eq!(updated.order, 1);
        assert_eq!(updated.chapter_id, chapter_id);

        assert!(repo
            .update_content(ParagraphId::new(999), "x")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_swap_exchanges_two_rows() {
        let pool = memory_pool().await;
        let (chapter_id, p) = chapter_with_paragraphs(&pool, "I", &["a", "b", "c", "d"]).await;
        let repo = SqliteParagraphRepository::new(pool);

        let list = repo.list_ordered(chapter_id).await.unwrap();
        repo.swap_order(chapter_id, list[2].slot(), list[1].slot())
            .await
            .unwrap();

        let after = repo.list_ordered(chapter_id).await.unwrap();
        assert_eq!(ids(&after), vec![p[0], p[2], p[1], p[3]]);
        assert_eq!(orders(&after), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_swap_with_stale_slot_is_rejected() {
        let pool = memory_pool().await;
        let (chapter_id, p) = chapter_with_paragraphs(&pool, "I", &["a", "b", "c"]).await;
        let repo = SqliteParagraphRepository::new(pool);

        let stale = repo.list_ordered(chapter_id).await.unwrap();
        // 另一个请求先把 b 和 c 交换
        repo.swap_order(chapter_id, stale[1].slot(), stale[2].slot())
            .await
            .unwrap();

        // 基于旧快照再交换 a 和 b，应被拒绝且不留下任何修改
        let err = repo
            .swap_order(chapter_id, stale[1].slot(), stale[0].slot())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let after = repo.list_ordered(chapter_id).await.unwrap();
        assert_eq!(ids(&after), vec![p[0], p[2], p[1]]);
        assert_eq!(orders(&after), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_swap_rolls_back_when_neighbour_moved() {
        let pool = memory_pool().await;
        let (chapter_id, p) = chapter_with_paragraphs(&pool, "I", &["a", "b", "c"]).await;
        let repo = SqliteParagraphRepository::new(pool);

        let list = repo.list_ordered(chapter_id).await.unwrap();
        let mut wrong_neighbour = list[1].slot();
        wrong_neighbour.order = 7;

        let err = repo
            .swap_order(chapter_id, list[0].slot(), wrong_neighbour)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        // 第一步的停放也必须被回滚
        let after = repo.list_ordered(chapter_id).await.unwrap();
        assert_eq!(ids(&after), p);
        assert_eq!(orders(&after), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_swap_rolls_back_when_parked_row_is_displaced() {
        let pool = memory_pool().await;
        let (chapter_id, p) = chapter_with_paragraphs(&pool, "I", &["a", "b", "c"]).await;

        // 相邻段落落位之后，把停放中的段落挪走，模拟第三步之前的外部写入
        sqlx::query(
            r#"
            CREATE TRIGGER displace_parked AFTER UPDATE OF sort_order ON paragraphs
            WHEN OLD.sort_order >= 0 AND NEW.sort_order >= 0
            BEGIN
                UPDATE paragraphs SET sort_order = 100 WHERE sort_order < 0;
            END
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let repo = SqliteParagraphRepository::new(pool);
        let list = repo.list_ordered(chapter_id).await.unwrap();

        let err = repo
            .swap_order(chapter_id, list[1].slot(), list[0].slot())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let after = repo.list_ordered(chapter_id).await.unwrap();
        assert_eq!(ids(&after), p);
        assert_eq!(orders(&after), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_delete_cascade_removes_comments_first() {
        let pool = memory_pool().await;
        let (chapter_id, p) = chapter_with_paragraphs(&pool, "I", &["a", "b"]).await;
        add_comment(&pool, p[0], "u1", "uno").await;
        add_comment(&pool, p[0], "u2", "dos").await;
        add_comment(&pool, p[1], "u1", "otro").await;
        let repo = SqliteParagraphRepository::new(pool.clone());

        let deleted = repo.delete_cascade(p[0]).await.unwrap().unwrap();
        assert_eq!(deleted.comments_removed, 2);
        assert_eq!(deleted.paragraph.chapter_id, chapter_id);

        assert!(repo.find_by_id(p[0]).await.unwrap().is_none());

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 1);

        assert!(repo.delete_cascade(p[0]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_plain_delete_with_comments_violates_foreign_key() {
        let pool = memory_pool().await;
        let (_, p) = chapter_with_paragraphs(&pool, "I", &["a"]).await;
        add_comment(&pool, p[0], "u1", "uno").await;

        let result = sqlx::query("DELETE FROM paragraphs WHERE id = ?")
            .bind(p[0].value())
            .execute(&pool)
            .await;
        assert!(result.is_err());
    }
}
