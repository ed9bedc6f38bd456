//! Message tags shared with the server

/// First byte of every request and response body.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Packed description project, or generated artifacts in reply
    DescriptorFile = 0,
    /// Query the result for a project identifier
    Request = 1,
    /// Ask again after the given number of seconds
    Timeout = 2,
    /// Packed conversion input, or the converted result in reply
    ProtoFile = 3,
    /// Send the full project again
    ReUpload = 4,
    /// Informational document, then ask again after a delay
    UnirailInfo = 5,
}

impl Opcode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Opcode::DescriptorFile),
            1 => Some(Opcode::Request),
            2 => Some(Opcode::Timeout),
            3 => Some(Opcode::ProtoFile),
            4 => Some(Opcode::ReUpload),
            5 => Some(Opcode::UnirailInfo),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether the server may send this opcode
    pub fn is_response(self) -> bool {
        !matches!(self, Opcode::Request)
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Opcode::DescriptorFile => "DescriptorFile",
            Opcode::Request => "Request",
            Opcode::Timeout => "Timeout",
            Opcode::ProtoFile => "ProtoFile",
            Opcode::ReUpload => "ReUpload",
            Opcode::UnirailInfo => "UnirailInfo",
        };
        f.write_str(name)
    }
}
