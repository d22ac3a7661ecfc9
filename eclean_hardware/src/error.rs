use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("{0} not responding")]
    NotResponding(&'static str),
    #[error("not connected")]
    NotConnected,
}

pub type Result<T> = std::result::Result<T, SimError>;
