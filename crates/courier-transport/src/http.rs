//! HTTP binding
//!
//! Each round is one POST whose entity is `[opcode][body]`; the response
//! entity is decoded exactly like a socket reply. The POST runs on a
//! worker thread so that [`Transport::send`] can return as soon as the
//! entity has been handed to the connection, while the reply is still
//! outstanding.

use crate::{Request, Response, Transport, TransportError, TransportResult};
use reqwest::blocking::{Body, Client, RequestBuilder};
use reqwest::header;
use std::io::{self, Cursor, Read};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Client identification sent with every request
pub const CLIENT_AGENT: &str = "AdHocAgent";

/// Entity type of requests
pub const CONTENT_TYPE: &str = "application/octet-stream";

/// Progress of one POST, reported by its worker
#[derive(Debug)]
enum Progress {
    /// The request entity was read to its end.
    Flushed,
    Reply(TransportResult<Vec<u8>>),
}

/// Round in progress
#[derive(Debug)]
enum Pending {
    Waiting(Receiver<Progress>),
    Answered(Vec<u8>),
}

/// Request entity that reports when it has been fully read
struct Entity {
    bytes: Cursor<Vec<u8>>,
    flushed: Option<Sender<Progress>>,
}

impl Entity {
    fn report_flushed(&mut self) {
        if let Some(flushed) = self.flushed.take() {
            let _ = flushed.send(Progress::Flushed);
        }
    }
}

impl Read for Entity {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.bytes.read(buf)?;
        if self.bytes.position() >= self.bytes.get_ref().len() as u64 {
            self.report_flushed();
        }
        Ok(n)
    }
}

/// Framed exchange over HTTP POST
#[derive(Debug)]
pub struct HttpTransport {
    url: String,
    client: Client,
    pending: Option<Pending>,
}

impl HttpTransport {
    /// Binding for an `http://` or `https://` URL. Without `read_timeout`
    /// a round waits as long as the server needs to answer.
    pub fn new(url: impl Into<String>, read_timeout: Option<Duration>) -> TransportResult<Self> {
        let client = Client::builder()
            .user_agent(CLIENT_AGENT)
            .timeout(read_timeout)
            .build()?;
        Ok(Self {
            url: url.into(),
            client,
            pending: None,
        })
    }
}

impl Transport for HttpTransport {
    fn send(&mut self, request: &Request) -> TransportResult<()> {
        let entity = request.encode_http();
        debug!(url = %self.url, opcode = %request.opcode(), bytes = entity.len(), "posting request");
        self.pending = None;

        let (progress, events) = mpsc::channel();
        let len = entity.len() as u64;
        let body = Body::sized(
            Entity {
                bytes: Cursor::new(entity),
                flushed: Some(progress.clone()),
            },
            len,
        );
        let post = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, CONTENT_TYPE)
            .header(header::ACCEPT, "*/*")
            .body(body);

        thread::Builder::new()
            .name("courier-http".to_string())
            .spawn(move || {
                let _ = progress.send(Progress::Reply(post_entity(post)));
            })?;

        match events.recv() {
            Ok(Progress::Flushed) => {
                self.pending = Some(Pending::Waiting(events));
                Ok(())
            }
            Ok(Progress::Reply(reply)) => {
                self.pending = Some(Pending::Answered(reply?));
                Ok(())
            }
            Err(_) => Err(worker_gone()),
        }
    }

    fn receive(&mut self) -> TransportResult<Response> {
        let body = match self.pending.take().ok_or(TransportError::NothingSent)? {
            Pending::Answered(body) => body,
            Pending::Waiting(events) => loop {
                match events.recv() {
                    Ok(Progress::Reply(reply)) => break reply?,
                    Ok(Progress::Flushed) => continue,
                    Err(_) => return Err(worker_gone()),
                }
            },
        };

        let response = Response::read_from(&mut body.as_slice())?;
        debug!(opcode = %response.opcode(), "response received");
        Ok(response)
    }
}

fn post_entity(post: RequestBuilder) -> TransportResult<Vec<u8>> {
    let reply = post.send()?;

    let status = reply.status();
    if !status.is_success() {
        return Err(TransportError::Http(format!("server answered {status}")));
    }

    Ok(reply.bytes()?.to_vec())
}

fn worker_gone() -> TransportError {
    TransportError::Http("request worker stopped without a reply".to_string())
}
