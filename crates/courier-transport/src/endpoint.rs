//! Binding selection from the configured server address

use crate::{HttpTransport, TcpTransport, Transport, TransportError, TransportResult};
use std::time::Duration;

/// Where the server listens, and through which binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `host:port` for the socket binding
    Tcp(String),
    /// `http://` or `https://` URL for the HTTP binding
    Http(String),
}

impl Endpoint {
    /// Parse a server address. A URL scheme selects HTTP, anything else
    /// must be `host:port`.
    pub fn parse(server: &str) -> TransportResult<Self> {
        let server = server.trim();

        if server.starts_with("http://") || server.starts_with("https://") {
            return Ok(Endpoint::Http(server.to_string()));
        }

        let (host, port) = server
            .rsplit_once(':')
            .ok_or_else(|| TransportError::InvalidEndpoint(format!("{server}: expected host:port")))?;
        if host.is_empty() || port.parse::<u16>().is_err() {
            return Err(TransportError::InvalidEndpoint(format!(
                "{server}: expected host:port"
            )));
        }

        Ok(Endpoint::Tcp(server.to_string()))
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Tcp(address) => write!(f, "tcp://{address}"),
            Endpoint::Http(url) => f.write_str(url),
        }
    }
}

/// Build the binding for an endpoint. `read_timeout` bounds the wait for
/// each reply; `None` waits until the server answers.
pub fn connect(
    endpoint: &Endpoint,
    read_timeout: Option<Duration>,
) -> TransportResult<Box<dyn Transport>> {
    tracing::info!(server = %endpoint, ?read_timeout, "using server");
    Ok(match endpoint {
        Endpoint::Tcp(address) => {
            Box::new(TcpTransport::new(address.clone()).with_read_timeout(read_timeout))
        }
        Endpoint::Http(url) => Box::new(HttpTransport::new(url.clone(), read_timeout)?),
    })
}
