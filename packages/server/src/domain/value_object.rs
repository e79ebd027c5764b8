//! Value Objects for the relay domain.

use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

/// Session identifier value object.
///
/// Assigned once per accepted connection and never reused within the
/// lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Create a new SessionId.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the inner numeric value.
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a session may still receive broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    Dead,
}

/// Liveness flag shared between a session's reader and its writers.
///
/// Starts alive. Once marked dead it never becomes alive again.
#[derive(Debug)]
pub struct LivenessFlag(AtomicBool);

impl LivenessFlag {
    pub fn new() -> Self {
        Self(AtomicBool::new(true))
    }

    pub fn get(&self) -> Liveness {
        if self.0.load(Ordering::Acquire) {
            Liveness::Alive
        } else {
            Liveness::Dead
        }
    }

    pub fn is_alive(&self) -> bool {
        self.get() == Liveness::Alive
    }

    /// Transition to dead.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn mark_dead(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

impl Default for LivenessFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_ordering() {
        // テスト項目: SessionId は数値順に並ぶ
        assert!(SessionId::new(1) < SessionId::new(2));
        assert_eq!(SessionId::new(7).value(), 7);
        assert_eq!(SessionId::new(7).to_string(), "7");
    }

    #[test]
    fn test_liveness_flag_starts_alive() {
        // テスト項目: 新しいフラグは alive 状態で始まる
        let flag = LivenessFlag::new();
        assert_eq!(flag.get(), Liveness::Alive);
        assert!(flag.is_alive());
    }

    #[test]
    fn test_liveness_flag_never_returns_to_alive() {
        // テスト項目: dead に遷移したフラグは alive に戻らず、遷移は一度だけ報告される
        // given (前提条件):
        let flag = LivenessFlag::new();

        // when (操作):
        let first = flag.mark_dead();
        let second = flag.mark_dead();

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(flag.get(), Liveness::Dead);
    }
}
