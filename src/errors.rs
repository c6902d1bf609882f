use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RtcError {
    #[error("Canvas error: binding is not mounted")]
    NotMounted,
    #[error("Canvas error: binding is already mounted")]
    AlreadyMounted,
    #[error("Canvas error: session host has been dropped")]
    HostDropped,
    #[error("Engine error: engine generation {generation} has been destroyed")]
    EngineDestroyed { generation: u64 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Configuration IO error: {0}")]
    ConfigIo(String),
}
