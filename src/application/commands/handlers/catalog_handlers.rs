//! Catalog Command Handlers - 种子数据导入

use std::sync::Arc;

use crate::application::commands::SeedCatalog;
use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterRepositoryPort, NewChapter};

/// 导入结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedCatalogResponse {
    pub chapters_created: usize,
    pub paragraphs_created: usize,
    /// 已有章节，未导入
    pub skipped: bool,
}

/// SeedCatalog Handler
///
/// 只在章节表为空时导入。先校验全部章节，再在一个事务中写入，
/// 失败时目录保持为空。
pub struct SeedCatalogHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl SeedCatalogHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, command: SeedCatalog) -> Result<SeedCatalogResponse, ApplicationError> {
        let existing = self.chapter_repo.count().await?;
        if existing > 0 {
            tracing::info!(existing_chapters = existing, "Catalog already populated, skipping seed");
            return Ok(SeedCatalogResponse {
                skipped: true,
                ..Default::default()
            });
        }

        let mut chapters = Vec::with_capacity(command.chapters.len());

        for (position, seed) in command.chapters.into_iter().enumerate() {
            let title = seed.title.trim();
            if title.is_empty() {
                return Err(ApplicationError::validation(format!(
                    "第 {} 个章节的标题不能为空",
                    position + 1
                )));
            }

            let mut paragraphs = Vec::with_capacity(seed.paragraphs.len());
            for (index, text) in seed.paragraphs.into_iter().enumerate() {
                if text.trim().is_empty() {
                    tracing::warn!(title = %title, index = index, "Skipping blank seed paragraph");
                    continue;
                }
                paragraphs.push(text);
            }

            chapters.push(NewChapter {
                title: title.to_string(),
                paragraphs,
            });
        }

        let imported = self.chapter_repo.import_catalog(&chapters).await?;

        for chapter in &imported.chapters {
            tracing::debug!(chapter_id = %chapter.id, title = %chapter.title, "Seed chapter created");
        }

        let response = SeedCatalogResponse {
            chapters_created: imported.chapters.len(),
            paragraphs_created: imported.paragraphs_created,
            skipped: false,
        };

        tracing::info!(
            chapters = response.chapters_created,
            paragraphs = response.paragraphs_created,
            "Catalog seeded"
        );

        Ok(response)
    }
}
