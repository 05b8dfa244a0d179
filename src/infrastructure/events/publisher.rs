//! Event Publisher Implementation
//!
//! 章节变更事件推送：全局通道 + 每个章节一个通道

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::domain::book::{ChapterId, CommentId, MoveDirection, ParagraphId};

const CHANNEL_CAPACITY: usize = 100;

/// WebSocket 事件类型
///
/// 事件只携带定位信息，客户端收到后重新拉取 `GET /api/chapters/:id`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all_fields = "camelCase")]
pub enum ChapterEvent {
    ParagraphCreated {
        chapter_id: ChapterId,
        paragraph_id: ParagraphId,
        order: i64,
    },
    ParagraphEdited {
        chapter_id: ChapterId,
        paragraph_id: ParagraphId,
    },
    ParagraphDeleted {
        chapter_id: ChapterId,
        paragraph_id: ParagraphId,
        comments_removed: usize,
    },
    ParagraphMoved {
        chapter_id: ChapterId,
        paragraph_id: ParagraphId,
        swapped_with: ParagraphId,
        direction: MoveDirection,
    },
    CommentAdded {
        chapter_id: ChapterId,
        paragraph_id: ParagraphId,
        comment_id: CommentId,
    },
}

impl ChapterEvent {
    pub fn chapter_id(&self) -> ChapterId {
        match self {
            ChapterEvent::ParagraphCreated { chapter_id, .. }
            | ChapterEvent::ParagraphEdited { chapter_id, .. }
            | ChapterEvent::ParagraphDeleted { chapter_id, .. }
            | ChapterEvent::ParagraphMoved { chapter_id, .. }
            | ChapterEvent::CommentAdded { chapter_id, .. } => *chapter_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChapterEvent::ParagraphCreated { .. } => "ParagraphCreated",
            ChapterEvent::ParagraphEdited { .. } => "ParagraphEdited",
            ChapterEvent::ParagraphDeleted { .. } => "ParagraphDeleted",
            ChapterEvent::ParagraphMoved { .. } => "ParagraphMoved",
            ChapterEvent::CommentAdded { .. } => "CommentAdded",
        }
    }
}

/// 事件发布器
pub struct EventPublisher {
    /// chapter_id -> broadcast sender
    chapter_channels: DashMap<ChapterId, broadcast::Sender<ChapterEvent>>,
    /// 全局通道，所有章节的事件
    global_channel: broadcast::Sender<ChapterEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (global_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            chapter_channels: DashMap::new(),
            global_channel: global_tx,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅全部章节的事件
    pub fn subscribe_global(&self) -> broadcast::Receiver<ChapterEvent> {
        self.global_channel.subscribe()
    }

    /// 订阅单个章节的事件，通道不存在时创建
    pub fn subscribe_chapter(&self, chapter_id: ChapterId) -> broadcast::Receiver<ChapterEvent> {
        self.chapter_channels
            .entry(chapter_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// 最后一个订阅者离开后移除章节通道
    pub fn release_chapter(&self, chapter_id: ChapterId) {
        self.chapter_channels
            .remove_if(&chapter_id, |_, sender| sender.receiver_count() == 0);
    }

    /// 发布事件到全局通道和所属章节通道
    pub fn publish(&self, event: ChapterEvent) {
        let chapter_id = event.chapter_id();

        if let Some(sender) = self.chapter_channels.get(&chapter_id) {
            if let Err(e) = sender.send(event.clone()) {
                tracing::debug!(
                    chapter_id = %chapter_id,
                    error = %e,
                    "Failed to publish chapter event (no receivers)"
                );
            }
        }

        let name = event.name();
        if let Err(e) = self.global_channel.send(event) {
            tracing::debug!(
                chapter_id = %chapter_id,
                event = name,
                error = %e,
                "Failed to publish global event (no receivers)"
            );
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
