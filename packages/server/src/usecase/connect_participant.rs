//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - ID の採番、セッションの生成、Registry への登録
//!
//! ### なぜこのテストが必要か
//! - ID は単調増加で再利用されないことを保証する
//! - 登録されたセッションだけがブロードキャスト対象になる
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加者の接続
//! - 異常系：採番済み ID との衝突（内部不整合）

use std::{net::SocketAddr, sync::Arc};

use crate::{
    domain::{Recipient, SessionIdFactory},
    infrastructure::{ConnectionRegistry, ParticipantSession, PeerWriter},
};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    registry: ConnectionRegistry,
    id_factory: SessionIdFactory,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(registry: ConnectionRegistry, id_factory: SessionIdFactory) -> Self {
        Self {
            registry,
            id_factory,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `peer_addr` - 接続元アドレス（ログ用）
    /// * `writer` - 接続の書き込み側
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<ParticipantSession>)` - 登録済みのセッション
    /// * `Err(ConnectError)` - 登録失敗（ID 重複）
    pub async fn execute(
        &self,
        peer_addr: Option<SocketAddr>,
        writer: PeerWriter,
    ) -> Result<Arc<ParticipantSession>, ConnectError> {
        // 1. ID を採番（プロセス内で再利用しない）
        let id = self.id_factory.generate();

        // 2. セッションを生成して Registry に登録
        let session = Arc::new(ParticipantSession::new(id, peer_addr, writer));
        self.registry
            .insert(id, session.clone() as Arc<dyn Recipient>)
            .await?;

        Ok(session)
    }
}
