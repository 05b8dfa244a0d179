//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（章节、段落、评论、用户仓储）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - identity: 请求级操作者
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod identity;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Catalog commands
    SeedCatalog,
    SeedChapter,
    // Comment commands
    AddComment,
    // Paragraph commands
    CreateParagraph,
    DeleteParagraph,
    EditParagraph,
    MoveParagraph,
    // Handlers
    handlers::{
        AddCommentHandler, AddCommentResponse, CreateParagraphHandler, DeleteParagraphHandler,
        DeleteParagraphResponse, EditParagraphHandler, MoveOutcome, MoveParagraphHandler,
        MoveParagraphResponse, SeedCatalogHandler, SeedCatalogResponse,
    },
};

pub use error::ApplicationError;

pub use identity::Actor;

pub use ports::{
    AuthoredCommentRecord, ChapterRecord, ChapterRepositoryPort, ChapterSnapshot, CommentRecord,
    CommentRepositoryPort, DeletedParagraph, ImportedCatalog, NewChapter, NewComment,
    ParagraphRecord, ParagraphRepositoryPort, RepositoryError, UserRecord, UserRepositoryPort,
};

pub use queries::{
    GetChapter,
    GetParagraph,
    ListChapters,
    ListParagraphs,
    // Handlers
    handlers::{GetChapterHandler, GetParagraphHandler, ListChaptersHandler, ListParagraphsHandler},
};
