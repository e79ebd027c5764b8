//! UseCase 層
//!
//! リレーのビジネスロジックを実装するレイヤー。
//! UI 層（接続ハンドラ）から呼び出され、Registry とセッションを操作します。

pub mod broadcast_message;
pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;

pub use broadcast_message::{BroadcastReport, BroadcastRouter};
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::ConnectError;
