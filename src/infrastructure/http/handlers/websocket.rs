//! WebSocket Handler - 章节变更事件推送

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use crate::domain::book::ChapterId;
use crate::infrastructure::events::ChapterEvent;
use crate::infrastructure::http::state::AppState;

/// 全局 WebSocket 连接处理（所有章节的事件）
pub async fn global_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let event_rx = state.event_publisher.subscribe_global();
        tracing::info!("Global WebSocket connected");

        forward_events(socket, event_rx, "global").await;

        tracing::info!("Global WebSocket disconnected");
    })
}

/// 章节 WebSocket 连接处理（单个章节的事件）
pub async fn chapter_websocket_handler(
    ws: WebSocketUpgrade,
    Path(chapter_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let chapter_id = ChapterId::new(chapter_id);

    ws.on_upgrade(move |socket| async move {
        let event_rx = state.event_publisher.subscribe_chapter(chapter_id);
        tracing::info!(chapter_id = %chapter_id, "Chapter WebSocket connected");

        forward_events(socket, event_rx, "chapter").await;

        state.event_publisher.release_chapter(chapter_id);
        tracing::info!(chapter_id = %chapter_id, "Chapter WebSocket disconnected");
    })
}

/// 把广播事件转发给客户端，直到任一方向断开
async fn forward_events(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<ChapterEvent>,
    scope: &'static str,
) {
    let (mut sender, mut receiver) = socket.split();

    // 事件转发任务
    let mut forward_task = tokio::spawn(async move {
        loop {
            let event = match event_rx.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // 客户端收到任何事件都会重新拉取章节，丢失的事件可以跳过
                    tracing::debug!(scope = scope, skipped = skipped, "WebSocket subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            let msg = match serde_json::to_string(&event) {
                Ok(json) => Message::Text(json),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize event");
                    continue;
                }
            };

            if let Err(e) = sender.send(msg).await {
                tracing::debug!(scope = scope, error = %e, "Failed to send WebSocket message");
                break;
            }
        }
    });

    // 接收客户端消息（心跳）
    let mut receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::debug!(scope = scope, "WebSocket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::debug!(scope = scope, error = %e, "WebSocket error");
                    break;
                }
                _ => {}
            }
        }
    });

    // 任一任务结束后停止另一个，等它退出后订阅才真正释放
    tokio::select! {
        _ = &mut forward_task => {
            receive_task.abort();
            let _ = receive_task.await;
        }
        _ = &mut receive_task => {
            forward_task.abort();
            let _ = forward_task.await;
        }
    }
}
