//! Chapter Query Handlers - 章节聚合读取

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterRepositoryPort, ParagraphRecord, ParagraphRepositoryPort};
use crate::application::queries::{GetChapter, GetParagraph, ListChapters, ListParagraphs};
use crate::domain::book::Chapter;

/// GetChapter Handler
pub struct GetChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl GetChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, query: GetChapter) -> Result<Chapter, ApplicationError> {
        let snapshot = self
            .chapter_repo
            .load_snapshot(query.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", query.chapter_id))?;

        let chapter = snapshot.into_chapter().map_err(|e| {
            tracing::error!(chapter_id = %query.chapter_id, error = %e, "Chapter snapshot is inconsistent");
            ApplicationError::from(e)
        })?;

        Ok(chapter)
    }
}

/// ListChapters Handler
pub struct ListChaptersHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl ListChaptersHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, _query: ListChapters) -> Result<Vec<Chapter>, ApplicationError> {
        let snapshots = self.chapter_repo.load_all_snapshots().await?;

        let chapters = snapshots
            .into_iter()
            .map(|snapshot| snapshot.into_chapter().map_err(ApplicationError::from))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = chapters.len(), "Chapters listed");

        Ok(chapters)
    }
}

/// ListParagraphs Handler
pub struct ListParagraphsHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    paragraph_repo: Arc<dyn ParagraphRepositoryPort>,
}

impl ListParagraphsHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        paragraph_repo: Arc<dyn ParagraphRepositoryPort>,
    ) -> Self {
        Self {
            chapter_repo,
            paragraph_repo,
        }
    }

    pub async fn handle(&self, query: ListParagraphs) -> Result<Vec<ParagraphRecord>, ApplicationError> {
        self.chapter_repo
            .find_by_id(query.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", query.chapter_id))?;

        let paragraphs = self.paragraph_repo.list_ordered(query.chapter_id).await?;

        Ok(paragraphs)
    }
}

/// GetParagraph Handler
pub struct GetParagraphHandler {
    paragraph_repo: Arc<dyn ParagraphRepositoryPort>,
}

impl GetParagraphHandler {
    pub fn new(paragraph_repo: Arc<dyn ParagraphRepositoryPort>) -> Self {
        Self { paragraph_repo }
    }

    pub async fn handle(&self, query: GetParagraph) -> Result<ParagraphRecord, ApplicationError> {
        self.paragraph_repo
            .find_by_id(query.paragraph_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Paragraph", query.paragraph_id))
    }
}
