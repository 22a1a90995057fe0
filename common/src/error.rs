use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid MAC address: {0}")]
    InvalidMac(String),
    #[error("invalid target: {0}")]
    InvalidTarget(String),
}
