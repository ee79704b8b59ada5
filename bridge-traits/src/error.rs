use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Playback engine rejected command: {0}")]
    CommandRejected(String),

    #[error("Playback engine is not ready")]
    EngineNotReady,
}

pub type Result<T> = std::result::Result<T, BridgeError>;
