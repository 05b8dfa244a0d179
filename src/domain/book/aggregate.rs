//! Book Context - Aggregate Root

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{BookError, ChapterId, Comment, Paragraph, ParagraphId};

/// Chapter 聚合根
///
/// 不变量:
/// - 段落按 order 严格递增排列，order 两两不同
/// - 每个段落都属于本章节
/// - 评论挂在所属段落下，保持插入顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    id: ChapterId,
    title: String,
    paragraphs: Vec<Paragraph>,
}

impl Chapter {
    /// 由一次快照读取到的记录组装聚合
    ///
    /// `paragraphs` 必须已按 order 升序，`comments` 按插入顺序。
    pub fn assemble(
        id: ChapterId,
        title: String,
        mut paragraphs: Vec<Paragraph>,
        comments: Vec<Comment>,
    ) -> Result<Self, BookError> {
        for paragraph in &paragraphs {
            if paragraph.chapter_id() != id {
                return Err(BookError::InconsistentState(format!(
                    "段落 {} 不属于章节 {}",
                    paragraph.id(),
                    id
                )));
            }
        }

        for pair in paragraphs.windows(2) {
            if pair[0].order() >= pair[1].order() {
                return Err(BookError::InconsistentState(format!(
                    "章节 {} 的段落顺序值不是严格递增: {} ({}) 之后是 {} ({})",
                    id,
                    pair[0].id(),
                    pair[0].order(),
                    pair[1].id(),
                    pair[1].order()
                )));
            }
        }

        let positions: HashMap<ParagraphId, usize> = paragraphs
            .iter()
            .enumerate()
            .map(|(position, p)| (p.id(), position))
            .collect();

        for comment in comments {
            let position = positions.get(&comment.paragraph_id()).copied().ok_or_else(|| {
                BookError::InconsistentState(format!(
                    "评论 {} 指向的段落 {} 不在章节 {} 中",
                    comment.id(),
                    comment.paragraph_id(),
                    id
                ))
            })?;
            paragraphs[position].push_comment(comment);
        }

        Ok(Self {
            id,
            title,
            paragraphs,
        })
    }

    // Getters
    pub fn id(&self) -> ChapterId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraph(&self, id: ParagraphId) -> Option<&Paragraph> {
        self.paragraphs.iter().find(|p| p.id() == id)
    }

    pub fn comment_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.comments().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{Author, CommentId};
    use chrono::Utc;

    fn paragraph(id: i64, chapter: i64, order: i64) -> Paragraph {
        let now = Utc::now();
        Paragraph::new(
            ParagraphId::new(id),
            ChapterId::new(chapter),
            format!("párrafo {}", id),
            order,
            now,
            now,
        )
    }

    fn comment(id: i64, paragraph: i64) -> Comment {
        Comment::new(
            CommentId::new(id),
            ParagraphId::new(paragraph),
            format!("comentario {}", id),
            Author::new("user-1", Some("Cervantes".to_string()), None),
            Utc::now(),
        )
    }

    #[test]
    fn test_assemble_groups_comments_in_insertion_order() {
        let chapter = Chapter::assemble(
            ChapterId::new(1),
            "Capítulo I".to_string(),
            vec![paragraph(10, 1, 0), paragraph(11, 1, 4)],
            vec![comment(3, 11), comment(1, 10), comment(2, 11)],
        )
        .unwrap();

        assert_eq!(chapter.paragraphs().len(), 2);
        assert_eq!(chapter.comment_count(), 3);

        let second = chapter.paragraph(ParagraphId::new(11)).unwrap();
        let ids: Vec<i64> = second.comments().iter().map(|c| c.id().value()).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_assemble_rejects_duplicate_order() {
        let result = Chapter::assemble(
            ChapterId::new(1),
            "Capítulo I".to_string(),
            vec![paragraph(10, 1, 2), paragraph(11, 1, 2)],
            Vec::new(),
        );
        assert!(matches!(result, Err(BookError::InconsistentState(_))));
    }

    #[test]
    fn test_assemble_rejects_foreign_paragraph() {
        let result = Chapter::assemble(
            ChapterId::new(1),
            "Capítulo I".to_string(),
            vec![paragraph(10, 2, 0)],
            Vec::new(),
        );
        assert!(matches!(result, Err(BookError::InconsistentState(_))));
    }

    #[test]
    fn test_assemble_rejects_orphan_comment() {
        let result = Chapter::assemble(
            ChapterId::new(1),
            "Capítulo I".to_string(),
            vec![paragraph(10, 1, 0)],
            vec![comment(1, 99)],
        );
        assert!(matches!(result, Err(BookError::InconsistentState(_))));
    }

    #[test]
    fn test_empty_chapter() {
        let chapter =
            Chapter::assemble(ChapterId::new(5), "Prólogo".to_string(), Vec::new(), Vec::new())
                .unwrap();
        assert!(chapter.paragraphs().is_empty());
        assert_eq!(chapter.title(), "Prólogo");
    }
}
