//! UseCase: 参加者切断処理
//!
//! 切断の方針は 1 か所にまとめる：Registry から削除してから接続を閉じる。
//! 読み込みループの終了・書き込み失敗・サーバー停止のいずれの経路でも
//! このユースケースを通る。

use std::sync::Arc;

use crate::{
    domain::{Recipient, SessionId},
    infrastructure::ConnectionRegistry,
};

/// 参加者切断のユースケース
#[derive(Clone)]
pub struct DisconnectParticipantUseCase {
    registry: ConnectionRegistry,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self { registry }
    }

    /// 参加者切断を実行
    ///
    /// Registry から削除し、削除できた場合はそのセッションを閉じる。
    /// すでに削除済みの ID に対しては何もしない（冪等）。
    ///
    /// # Returns
    ///
    /// * `Some(session)` - この呼び出しで削除されたセッション
    /// * `None` - 登録されていなかった
    pub async fn execute(&self, id: SessionId) -> Option<Arc<dyn Recipient>> {
        let session = self.registry.remove(id).await?;
        session.close().await;
        tracing::debug!("Session {} removed from registry and closed", id);
        Some(session)
    }

    /// 全参加者を切断する（サーバー停止時）
    ///
    /// # Returns
    ///
    /// 切断したセッション数
    pub async fn execute_all(&self) -> usize {
        let sessions = self.registry.drain().await;
        for session in &sessions {
            session.close().await;
        }
        sessions.len()
    }

    /// 残りの参加者数を取得
    pub async fn count_remaining_participants(&self) -> usize {
        self.registry.len().await
    }
}
