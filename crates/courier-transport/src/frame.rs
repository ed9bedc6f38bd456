//! Request and response framing
//!
//! Socket requests carry a 3-byte big-endian length ahead of the opcode.
//! For uploads it counts opcode and body; for result queries it counts
//! only the project identifier. HTTP requests drop the length prefix.
//!
//! Responses have no outer length: the opcode says which parts follow,
//! and an archive runs to the end of the stream.

use crate::{Opcode, TransportError, TransportResult};
use std::io::Read;

/// Largest value the 3-byte length prefix can hold
pub const MAX_SOCKET_FRAME: usize = 0x00FF_FFFF;

/// An outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    opcode: Opcode,
    body: Vec<u8>,
}

impl Request {
    /// Full upload of a packed archive, tagged `DescriptorFile` or `ProtoFile`
    pub fn upload(opcode: Opcode, archive: Vec<u8>) -> Self {
        Self {
            opcode,
            body: archive,
        }
    }

    /// Lightweight result query by project identifier
    pub fn query(project_id: &str) -> Self {
        Self {
            opcode: Opcode::Request,
            body: project_id.as_bytes().to_vec(),
        }
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Whether this is a result query rather than an upload
    pub fn is_query(&self) -> bool {
        self.opcode == Opcode::Request
    }

    /// Frame for the socket binding: `[len:3][opcode][body]`
    pub fn encode_socket(&self) -> TransportResult<Vec<u8>> {
        let len = if self.is_query() {
            self.body.len()
        } else {
            self.body.len() + 1
        };
        if len > MAX_SOCKET_FRAME {
            return Err(TransportError::FrameTooLarge { len });
        }

        let mut frame = Vec::with_capacity(4 + self.body.len());
        frame.extend_from_slice(&(len as u32).to_be_bytes()[1..]);
        frame.push(self.opcode.as_u8());
        frame.extend_from_slice(&self.body);
        Ok(frame)
    }

    /// Entity for the HTTP binding: `[opcode][body]`
    pub fn encode_http(&self) -> Vec<u8> {
        let mut entity = Vec::with_capacity(1 + self.body.len());
        entity.push(self.opcode.as_u8());
        entity.extend_from_slice(&self.body);
        entity
    }
}

/// A decoded server reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Ask again after `secs` seconds
    Timeout { secs: u8 },
    /// Result archive; `opcode` is `DescriptorFile` or `ProtoFile`
    Artifacts { opcode: Opcode, archive: Vec<u8> },
    /// Send the full project again
    ReUpload,
    /// Archive with an informational document, then ask again after `secs`
    Info { secs: u8, archive: Vec<u8> },
}

impl Response {
    /// Decode one response, consuming `reader` to its end when an archive follows.
    pub fn read_from<R: Read>(reader: &mut R) -> TransportResult<Self> {
        let code = read_byte(reader, "empty response")?;
        let opcode = Opcode::from_u8(code)
            .filter(|op| op.is_response())
            .ok_or(TransportError::UnknownOpcode(code))?;

        let response = match opcode {
            Opcode::Timeout => Response::Timeout {
                secs: read_byte(reader, "missing wait duration")?,
            },
            Opcode::ReUpload => Response::ReUpload,
            Opcode::DescriptorFile | Opcode::ProtoFile => Response::Artifacts {
                opcode,
                archive: read_archive(reader)?,
            },
            Opcode::UnirailInfo => Response::Info {
                secs: read_byte(reader, "missing wait duration")?,
                archive: read_archive(reader)?,
            },
            Opcode::Request => return Err(TransportError::UnknownOpcode(code)),
        };

        Ok(response)
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Response::Timeout { .. } => Opcode::Timeout,
            Response::Artifacts { opcode, .. } => *opcode,
            Response::ReUpload => Opcode::ReUpload,
            Response::Info { .. } => Opcode::UnirailInfo,
        }
    }
}

fn read_byte<R: Read>(reader: &mut R, missing: &str) -> TransportResult<u8> {
    let mut byte = [0u8; 1];
    match reader.read_exact(&mut byte) {
        Ok(()) => Ok(byte[0]),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(TransportError::Truncated(missing.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

fn read_archive<R: Read>(reader: &mut R) -> TransportResult<Vec<u8>> {
    let mut archive = Vec::new();
    reader.read_to_end(&mut archive)?;
    if archive.is_empty() {
        return Err(TransportError::Truncated("missing archive".to_string()));
    }
    Ok(archive)
}
