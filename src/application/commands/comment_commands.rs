//! Comment Commands

use crate::application::identity::Actor;
use crate::domain::book::ParagraphId;

/// 发表评论命令
#[derive(Debug, Clone)]
pub struct AddComment {
    pub actor: Actor,
    pub paragraph_id: ParagraphId,
    pub content: String,
}
