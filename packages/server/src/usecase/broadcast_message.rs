//! UseCase: メッセージのブロードキャスト
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastRouter::broadcast() メソッド
//! - 送信者以外の alive な全参加者への配送
//!
//! ### なぜこのテストが必要か
//! - 送信者に自分のメッセージが返らないこと（エコーなし）
//! - 1 人への配送失敗が他の参加者への配送を妨げないこと
//! - 配送に失敗した参加者が Registry から取り除かれること
//!
//! ### どのような状況を想定しているか
//! - 正常系：3 人中 1 人が送信
//! - 異常系：受信者の 1 人が切断済み
//! - エッジケース：送信者しか接続していない

use futures_util::future::join_all;

use crate::{
    domain::{Delivery, Message, SessionId},
    infrastructure::ConnectionRegistry,
};

use super::disconnect_participant::DisconnectParticipantUseCase;

/// Result of one broadcast
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Recipients the line was written to, in id order
    pub delivered: Vec<SessionId>,
    /// Recipients whose send failed; they have been disconnected
    pub failed: Vec<SessionId>,
}

/// Delivers each message to every other live participant.
#[derive(Clone)]
pub struct BroadcastRouter {
    registry: ConnectionRegistry,
    disconnect: DisconnectParticipantUseCase,
}

impl BroadcastRouter {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self {
            disconnect: DisconnectParticipantUseCase::new(registry.clone()),
            registry,
        }
    }

    /// Send `message` to every live session except its sender.
    ///
    /// Recipients are taken from a registry snapshot, so the registry lock is
    /// not held while writing. Sends run concurrently and a failure for one
    /// recipient does not affect the others. Returns once every send has
    /// finished; recipients that failed are removed and closed before return.
    pub async fn broadcast(&self, message: &Message) -> BroadcastReport {
        let recipients: Vec<_> = self
            .registry
            .snapshot()
            .await
            .into_iter()
            .filter(|recipient| recipient.id() != message.sender)
            .collect();

        let deliveries = join_all(recipients.iter().map(|recipient| async move {
            (recipient.id(), recipient.send(&message.text).await)
        }))
        .await;

        let mut report = BroadcastReport::default();
        for (id, delivery) in deliveries {
            match delivery {
                Delivery::Delivered => report.delivered.push(id),
                Delivery::NotDelivered => {
                    tracing::info!("Dropping session {} after failed delivery", id);
                    self.disconnect.execute(id).await;
                    report.failed.push(id);
                }
            }
        }

        tracing::debug!(
            "Broadcast from session {} delivered to {} session(s), {} failed",
            message.sender,
            report.delivered.len(),
            report.failed.len()
        );
        report
    }
}
