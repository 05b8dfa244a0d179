//! Reorder Command Handler - 段落上移/下移
//!
//! 读取顺序列表，规划一次相邻交换，再以比较并交换的方式写回。
//! 写回时发现顺序值已被其他请求改动则重新读取，最多重试 `max_retries` 次。

use std::sync::Arc;

use serde::Serialize;

use crate::application::commands::MoveParagraph;
use crate::application::error::ApplicationError;
use crate::application::ports::{ParagraphRecord, ParagraphRepositoryPort, RepositoryError};
use crate::domain::book::{ChapterId, MoveDirection, ParagraphId};
use crate::domain::{is_strictly_increasing, plan_move, MovePlan, OrderSlot};

/// 移动结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MoveOutcome {
    /// 与相邻段落交换了 order
    #[serde(rename_all = "camelCase")]
    Moved {
        swapped_with: ParagraphId,
        new_order: i64,
    },
    /// 已在边界，没有修改
    Unchanged,
}

/// 移动段落响应
#[derive(Debug, Clone)]
pub struct MoveParagraphResponse {
    pub paragraph_id: ParagraphId,
    pub chapter_id: ChapterId,
    pub direction: MoveDirection,
    pub outcome: MoveOutcome,
    /// 实际尝试次数（无冲突时为 1）
    pub attempts: u32,
}

/// MoveParagraph Handler
pub struct MoveParagraphHandler {
    paragraph_repo: Arc<dyn ParagraphRepositoryPort>,
    max_retries: u32,
}

impl MoveParagraphHandler {
    pub fn new(paragraph_repo: Arc<dyn ParagraphRepositoryPort>, max_retries: u32) -> Self {
        Self {
            paragraph_repo,
            max_retries,
        }
    }

    pub async fn handle(
        &self,
        command: MoveParagraph,
    ) -> Result<MoveParagraphResponse, ApplicationError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.try_move(command.paragraph_id, command.direction).await {
                Ok((paragraph, outcome)) => {
                    tracing::info!(
                        paragraph_id = %paragraph.id,
                        chapter_id = %paragraph.chapter_id,
                        direction = %command.direction,
                        outcome = ?outcome,
                        attempts = attempts,
                        user_id = %command.actor.user_id,
                        "Paragraph move finished"
                    );

                    return Ok(MoveParagraphResponse {
                        paragraph_id: paragraph.id,
                        chapter_id: paragraph.chapter_id,
                        direction: command.direction,
                        outcome,
                        attempts,
                    });
                }
                Err(AttemptError::Conflict(reason)) if attempts <= self.max_retries => {
                    tracing::warn!(
                        paragraph_id = %command.paragraph_id,
                        attempt = attempts,
                        reason = %reason,
                        "Order changed concurrently, retrying move"
                    );
                }
                Err(AttemptError::Conflict(reason)) => {
                    tracing::warn!(
                        paragraph_id = %command.paragraph_id,
                        attempts = attempts,
                        reason = %reason,
                        "Giving up move after repeated conflicts"
                    );
                    return Err(ApplicationError::Conflict(format!(
                        "paragraph {} could not be moved after {} attempts: {}",
                        command.paragraph_id, attempts, reason
                    )));
                }
                Err(AttemptError::Failed(e)) => return Err(e),
            }
        }
    }

    /// 单次尝试：读取、规划、比较并交换
    async fn try_move(
        &self,
        paragraph_id: ParagraphId,
        direction: MoveDirection,
    ) -> Result<(ParagraphRecord, MoveOutcome), AttemptError> {
        let paragraph = self
            .paragraph_repo
            .find_by_id(paragraph_id)
            .await?
            .ok_or_else(|| {
                AttemptError::Failed(ApplicationError::not_found("Paragraph", paragraph_id))
            })?;

        let ordered = self.paragraph_repo.list_ordered(paragraph.chapter_id).await?;
        let slots: Vec<OrderSlot> = ordered.iter().map(ParagraphRecord::slot).collect();

        if !is_strictly_increasing(&slots) {
            return Err(AttemptError::Failed(ApplicationError::invalid_state(format!(
                "chapter {} has duplicate paragraph orders",
                paragraph.chapter_id
            ))));
        }

        // 两次读取之间段落被删除或移到别处时，按并发冲突重试
        let plan = plan_move(&slots, paragraph_id, direction)
            .map_err(|e| AttemptError::Conflict(e.to_string()))?;

        match plan {
            MovePlan::Stay => Ok((paragraph, MoveOutcome::Unchanged)),
            MovePlan::Swap { moving, neighbour } => {
                self.paragraph_repo
                    .swap_order(paragraph.chapter_id, moving, neighbour)
                    .await?;

                Ok((
                    paragraph,
                    MoveOutcome::Moved {
                        swapped_with: neighbour.paragraph_id,
                        new_order: neighbour.order,
                    },
                ))
            }
        }
    }
}

/// 单次尝试的失败：可重试的冲突，或直接返回的错误
enum AttemptError {
    Conflict(String),
    Failed(ApplicationError),
}

impl From<RepositoryError> for AttemptError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(reason) => AttemptError::Conflict(reason),
            other => AttemptError::Failed(other.into()),
        }
    }
}
