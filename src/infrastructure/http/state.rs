//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use super::auth::IdentityHeaders;
use crate::application::{
    // Command handlers
    AddCommentHandler, CreateParagraphHandler, DeleteParagraphHandler, EditParagraphHandler,
    MoveParagraphHandler,
    // Query handlers
    GetChapterHandler, GetParagraphHandler, ListChaptersHandler, ListParagraphsHandler,
    // Ports
    ChapterRepositoryPort, CommentRepositoryPort, ParagraphRepositoryPort, UserRepositoryPort,
};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Infrastructure ==========
    pub event_publisher: Arc<EventPublisher>,
    pub identity_headers: IdentityHeaders,

    // ========== Command Handlers ==========
    pub create_paragraph_handler: CreateParagraphHandler,
    pub edit_paragraph_handler: EditParagraphHandler,
    pub delete_paragraph_handler: DeleteParagraphHandler,
    pub move_paragraph_handler: MoveParagraphHandler,
    pub add_comment_handler: AddCommentHandler,

    // ========== Query Handlers ==========
    pub get_chapter_handler: GetChapterHandler,
    pub list_chapters_handler: ListChaptersHandler,
    pub list_paragraphs_handler: ListParagraphsHandler,
    pub get_paragraph_handler: GetParagraphHandler,
}

/// AppState 依赖的仓储
#[derive(Clone)]
pub struct Repositories {
    pub chapters: Arc<dyn ChapterRepositoryPort>,
    pub paragraphs: Arc<dyn ParagraphRepositoryPort>,
    pub comments: Arc<dyn CommentRepositoryPort>,
    pub users: Arc<dyn UserRepositoryPort>,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        repos: Repositories,
        event_publisher: Arc<EventPublisher>,
        identity_headers: IdentityHeaders,
        reorder_max_retries: u32,
    ) -> Self {
        Self {
            event_publisher,
            identity_headers,

            // Command handlers
            create_paragraph_handler: CreateParagraphHandler::new(
                repos.chapters.clone(),
                repos.paragraphs.clone(),
            ),
            edit_paragraph_handler: EditParagraphHandler::new(repos.paragraphs.clone()),
            delete_paragraph_handler: DeleteParagraphHandler::new(repos.paragraphs.clone()),
            move_paragraph_handler: MoveParagraphHandler::new(
                repos.paragraphs.clone(),
                reorder_max_retries,
            ),
            add_comment_handler: AddCommentHandler::new(
                repos.paragraphs.clone(),
                repos.comments.clone(),
                repos.users.clone(),
            ),

            // Query handlers
            get_chapter_handler: GetChapterHandler::new(repos.chapters.clone()),
            list_chapters_handler: ListChaptersHandler::new(repos.chapters.clone()),
            list_paragraphs_handler: ListParagraphsHandler::new(
                repos.chapters.clone(),
                repos.paragraphs.clone(),
            ),
            get_paragraph_handler: GetParagraphHandler::new(repos.paragraphs),
        }
    }
}
