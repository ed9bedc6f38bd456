//! Socket binding
//!
//! One connection per round: connect and write the length-prefixed frame,
//! then read the reply on the same stream until the server closes it.

use crate::{Request, Response, Transport, TransportError, TransportResult};
use std::io::{BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;
use tracing::debug;

/// Raw framed exchange over TCP
#[derive(Debug)]
pub struct TcpTransport {
    address: String,
    read_timeout: Option<Duration>,
    pending: Option<TcpStream>,
}

impl TcpTransport {
    /// Binding for a `host:port` address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            read_timeout: None,
            pending: None,
        }
    }

    /// Give up on a reply after `timeout` without data; `None` waits
    /// as long as the server needs.
    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, request: &Request) -> TransportResult<()> {
        let frame = request.encode_socket()?;
        self.pending = None;

        let mut stream = TcpStream::connect(&self.address)?;
        stream.set_read_timeout(self.read_timeout)?;
        debug!(address = %self.address, opcode = %request.opcode(), bytes = frame.len(), "connected, sending frame");

        stream.write_all(&frame)?;
        stream.flush()?;
        self.pending = Some(stream);
        Ok(())
    }

    fn receive(&mut self) -> TransportResult<Response> {
        let stream = self.pending.take().ok_or(TransportError::NothingSent)?;

        let response = Response::read_from(&mut BufReader::new(stream))?;
        debug!(opcode = %response.opcode(), "response received");
        Ok(response)
    }
}
