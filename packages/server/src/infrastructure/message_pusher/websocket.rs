//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//!
//! これにより、「WebSocket の生成」と「メッセージの送信」が分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成
//! - Infrastructure 層: sender の管理、メッセージ送信

use std::collections::HashMap;

use async_trait::async_trait;
use futures_util::future::join_all;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
///
/// 接続中のクライアントの sender を `ConnectionId` をキーとして保持する。
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id.clone(), sender);
        tracing::debug!(
            "Connection '{}' registered to MessagePusher",
            connection_id.as_str()
        );
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id.as_str()
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(connection_id) {
            sender
                .send(content.to_string())
                .map_err(|_| MessagePushError::ChannelClosed(connection_id.as_str().to_string()))?;
            tracing::debug!("Pushed message to connection '{}'", connection_id.as_str());
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(
                connection_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        // 全宛先へ並行に送信し、完了を待ち合わせる。
        // 一部の宛先への送信失敗はブロードキャスト全体の失敗にはしない
        let sends = targets
            .iter()
            .map(|target| async move { (target, self.push_to(target, content).await) });

        for (target, result) in join_all(sends).await {
            if let Err(e) = result {
                tracing::warn!(
                    "Failed to push message to connection '{}': {}",
                    target.as_str(),
                    e
                );
            }
        }

        Ok(())
    }
}
