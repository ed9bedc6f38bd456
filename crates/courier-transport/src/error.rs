//! Transport errors

use courier_core::CourierError;
use thiserror::Error;

/// Result type alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur while exchanging frames
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("invalid server address: {0}")]
    InvalidEndpoint(String),

    #[error("request of {len} bytes does not fit a socket frame")]
    FrameTooLarge { len: usize },

    #[error("unexpected response opcode {0}")]
    UnknownOpcode(u8),

    #[error("truncated response: {0}")]
    Truncated(String),

    #[error("no request is awaiting a reply")]
    NothingSent,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Http(err.to_string())
    }
}

impl From<TransportError> for CourierError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::UnknownOpcode(_) | TransportError::Truncated(_) => {
                CourierError::Protocol(err.to_string())
            }
            TransportError::InvalidEndpoint(_) => CourierError::Config(err.to_string()),
            _ => CourierError::Transport(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use courier_core::exit_codes;

    #[test]
    fn TransportError___unknown_opcode___maps_to_protocol_exit() {
        let err: CourierError = TransportError::UnknownOpcode(9).into();

        assert!(matches!(err, CourierError::Protocol(_)));
        assert_eq!(err.exit_code(), exit_codes::PROTOCOL);
    }

    #[test]
    fn TransportError___truncated___maps_to_protocol_exit() {
        let err: CourierError = TransportError::Truncated("missing duration byte".into()).into();

        assert_eq!(err.exit_code(), exit_codes::PROTOCOL);
    }

    #[test]
    fn TransportError___io___maps_to_unexpected_exit() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: CourierError = TransportError::from(io).into();

        assert!(matches!(err, CourierError::Transport(_)));
        assert_eq!(err.exit_code(), exit_codes::UNEXPECTED);
    }

    #[test]
    fn TransportError___invalid_endpoint___maps_to_config() {
        let err: CourierError = TransportError::InvalidEndpoint("nowhere".into()).into();

        assert_eq!(err.exit_code(), exit_codes::CONFIG);
    }
}
