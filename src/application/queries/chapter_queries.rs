//! Chapter Queries

use crate::domain::book::{ChapterId, ParagraphId};

/// 获取章节聚合（段落与评论）
#[derive(Debug, Clone)]
pub struct GetChapter {
    pub chapter_id: ChapterId,
}

/// 列出全部章节（完整展开）
#[derive(Debug, Clone)]
pub struct ListChapters;

/// 获取章节内按顺序排列的段落
#[derive(Debug, Clone)]
pub struct ListParagraphs {
    pub chapter_id: ChapterId,
}

/// 获取单个段落
#[derive(Debug, Clone)]
pub struct GetParagraph {
    pub paragraph_id: ParagraphId,
}
