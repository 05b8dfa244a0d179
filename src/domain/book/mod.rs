//! Book Context - 书籍限界上下文
//!
//! 职责:
//! - 章节聚合（章节 → 有序段落 → 评论 → 作者）
//! - 段落、评论实体
//! - 正文、移动方向等值对象

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::Chapter;
pub use entities::{Author, Comment, Paragraph};
pub use errors::BookError;
pub use value_objects::{ChapterId, CommentId, Content, MoveDirection, ParagraphId};
