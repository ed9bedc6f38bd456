//! courier-transport - Framed wire protocol and its two bindings
//!
//! This crate provides:
//! - [`Opcode`] the closed table of message tags
//! - [`Request`] and [`Response`] for message framing
//! - [`Transport`] trait with [`TcpTransport`] and [`HttpTransport`]
//! - [`Endpoint`] to pick a binding from the configured server address

mod endpoint;
mod error;
mod frame;
mod http;
mod opcode;
mod tcp;

pub use endpoint::{Endpoint, connect};
pub use error::{TransportError, TransportResult};
pub use frame::{MAX_SOCKET_FRAME, Request, Response};
pub use http::{CLIENT_AGENT, CONTENT_TYPE, HttpTransport};
pub use opcode::Opcode;
pub use tcp::TcpTransport;

/// One request/response round with the server.
///
/// A round is split at the moment the request has been handed to the
/// connection: [`Transport::send`] returns once the request is written,
/// [`Transport::receive`] blocks until the reply to it is complete.
/// Bindings keep no state between rounds.
pub trait Transport {
    /// Write `request` to the server.
    fn send(&mut self, request: &Request) -> TransportResult<()>;

    /// Read the reply to the request last sent.
    fn receive(&mut self) -> TransportResult<Response>;

    /// Send `request` and read the server's reply.
    fn exchange(&mut self, request: &Request) -> TransportResult<Response> {
        self.send(request)?;
        self.receive()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, request: &Request) -> TransportResult<()> {
        (**self).send(request)
    }

    fn receive(&mut self) -> TransportResult<Response> {
        (**self).receive()
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Endpoint, Opcode, Request, Response, Transport, TransportError};
}
