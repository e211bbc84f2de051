use thiserror::Error;

/// Errors produced while decoding a request or encoding a response.
///
/// An unsupported opcode is not an error: it is answered with RCODE 4.
#[derive(Error, Debug)]
pub enum DnsError {
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("name too long: {0}")]
    NameTooLong(String),

    #[error("invalid label: {0}")]
    InvalidLabel(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("name not found: {0}")]
    NameNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DnsError>;
