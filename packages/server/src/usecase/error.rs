//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::RegistryError;

/// Errors that can occur while registering a new participant
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// The registry refused the session
    #[error("failed to register participant: {0}")]
    Registry(#[from] RegistryError),
}
