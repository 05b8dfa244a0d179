//! Paragraph Commands

use crate::application::identity::Actor;
use crate::domain::book::{ChapterId, MoveDirection, ParagraphId};

/// 新增段落命令（追加到章节末尾）
#[derive(Debug, Clone)]
pub struct CreateParagraph {
    pub actor: Actor,
    pub chapter_id: ChapterId,
    pub content: String,
}

/// 编辑段落正文命令
#[derive(Debug, Clone)]
pub struct EditParagraph {
    pub actor: Actor,
    pub paragraph_id: ParagraphId,
    pub content: String,
}

/// 删除段落命令（连同评论）
#[derive(Debug, Clone)]
pub struct DeleteParagraph {
    pub actor: Actor,
    pub paragraph_id: ParagraphId,
}

/// 移动段落命令（与相邻段落交换位置）
#[derive(Debug, Clone)]
pub struct MoveParagraph {
    pub actor: Actor,
    pub paragraph_id: ParagraphId,
    pub direction: MoveDirection,
}
