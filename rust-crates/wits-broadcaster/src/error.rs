use thiserror::Error;

#[derive(Error, Debug)]
pub enum BroadcasterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No records to replay")]
    EmptySequence,

    #[error("Server not started")]
    NotStarted,

    #[error("Server already started")]
    AlreadyRunning,
}

pub type Result<T> = std::result::Result<T, BroadcasterError>;
