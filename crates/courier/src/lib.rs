//! # courier
//!
//! Client agent for a remote code-generation service.
//!
//! A description file declares the hosts, packs and channels of a protocol.
//! courier checks it locally, uploads it, polls until the server has
//! generated the code, then extracts the result and copies each host's
//! output to the directories configured for it:
//! - [`Frontend`] turns a description file into a [`SymbolModel`]
//! - [`Validator`] and [`ConstantHarvester`] check it before anything is sent
//! - [`Packager`] builds the upload archive
//! - [`Session`] runs the submit/poll protocol over a [`Transport`]
//! - [`Deployer`] extracts and distributes the returned artifacts
//! - [`description`] manages the description file between runs
//!
//! ## Example
//!
//! ```ignore
//! use courier::prelude::*;
//!
//! let config = AgentConfig::from_file("courier.toml")?;
//! let transport = courier::connect(&Endpoint::parse(&config.server)?, config.read_timeout())?;
//! let mut session = Session::new(transport, ThreadSleeper, config.retry.clone());
//! let rounds = session.run(&mut job, Start::Upload)?;
//! ```
//!
//! ## Crate Structure
//!
//! Besides its own modules this crate re-exports from:
//! - [`courier_core`] - Errors, configuration, symbol model and validation
//! - [`courier_bundle`] - Zip archive packing and extraction
//! - [`courier_transport`] - Opcodes, framing and the two bindings

mod deploy;
pub mod description;
mod frontend;
mod package;
mod session;
pub mod source_text;

pub use deploy::{DeployReport, Deployer, OUTPUT_ROOTS, PathError, SKIPPED_FILES};
pub use frontend::{CommandFrontend, Frontend, SIDECAR_SUFFIX, SidecarFrontend, from_config};
pub use package::{Packager, SOURCE_EXTENSION};
pub use session::{Session, Sleeper, Start, Submission, ThreadSleeper};

// Re-export core types
pub use courier_core::{
    AgentConfig, ConstantHarvester, CourierError, CourierResult, DescriptionProject, LogLevel,
    SessionState, SymbolModel, ValidationReport, Validator, exit_codes,
};

// Re-export the wire layer
pub use courier_transport::{Endpoint, Opcode, Request, Response, Transport, connect};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        AgentConfig, CourierError, CourierResult, DeployReport, Deployer, DescriptionProject,
        Endpoint, Frontend, Opcode, Packager, Request, Session, Sleeper, Start, Submission,
        ThreadSleeper, Transport, Validator,
    };
}
