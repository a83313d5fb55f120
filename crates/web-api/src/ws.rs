//! WebSocket 实时通道
//!
//! 每个连接分配一个新的 `ChannelId` 并订阅进程内发布器。客户端
//! 发送 register 帧把自己的 userId 绑定到这个通道，之后定向事件
//! 才能找到它；广播事件对所有连接可见。断开时注销通道。

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use application::EventEnvelope;
use domain::{ChannelId, UserId};

use crate::state::AppState;

/// 客户端上行帧，目前只有 register 一种
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    Register {
        #[serde(rename = "userId")]
        user_id: UserId,
    },
}

pub async fn websocket_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let channel = ChannelId::from(Uuid::new_v4());
    let mut events = state.publisher.subscribe();
    let (mut sender, mut incoming) = socket.split();

    tracing::info!(channel_id = %channel, "WebSocket 连接已建立");

    // 发送任务：订阅发布器并把属于本通道的信封转发给客户端
    let send_task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(envelope) => {
                    if !is_for_channel(&envelope, channel) {
                        continue;
                    }
                    let payload = match serde_json::to_string(&envelope.event) {
                        Ok(json) => json,
                        Err(err) => {
                            tracing::warn!(error = %err, "事件序列化失败");
                            continue;
                        }
                    };
                    if sender.send(WsMessage::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                // 消费太慢被挤掉的事件直接丢弃，通道本身不提供送达保证
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(channel_id = %channel, skipped, "事件通道滞后，丢弃事件");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // 接收循环：处理客户端上行帧直到连接断开
    while let Some(Ok(message)) = incoming.next().await {
        match message {
            WsMessage::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Register { user_id }) => {
                    state.presence.register(user_id, channel).await;
                }
                Err(err) => {
                    tracing::debug!(channel_id = %channel, error = %err, "忽略无法识别的客户端帧");
                }
            },
            WsMessage::Close(_) => break,
            _ => {}
        }
    }

    send_task.abort();
    state.presence.unregister(channel).await;
    tracing::info!(channel_id = %channel, "WebSocket 连接已断开，通道已注销");
}

fn is_for_channel(envelope: &EventEnvelope, channel: ChannelId) -> bool {
    match envelope.target {
        None => true,
        Some(target) => target == channel,
    }
}
