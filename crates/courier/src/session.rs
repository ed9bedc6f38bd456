//! Submit/poll/deploy protocol session
//!
//! A [`Session`] drives one submission to completion over a [`Transport`].
//! What gets uploaded and what happens with the server's answers is left
//! to a [`Submission`]; waiting between polls goes through a [`Sleeper`].

use courier_core::{CourierError, CourierResult, RetryPolicy, SessionState};
use courier_transport::{Opcode, Request, Response, Transport};
use tracing::{debug, info};

/// Blocks between result queries
pub trait Sleeper {
    fn sleep(&mut self, secs: u64);
}

/// Sleeps on the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, secs: u64) {
        info!("waiting {secs}s for the result");
        std::thread::sleep(std::time::Duration::from_secs(secs));
    }
}

/// The job side of a session
pub trait Submission {
    /// Full upload of the project. Called for the first round and again
    /// whenever the server asks for the project.
    fn upload_request(&mut self) -> CourierResult<Request>;

    /// Result query for the project
    fn query_request(&self) -> Request;

    /// A request was written to the server; its response has not been
    /// read yet and may never arrive.
    fn on_sent(&mut self, request: &Request) -> CourierResult<()>;

    /// An informational archive arrived ahead of the result.
    fn on_info(&mut self, archive: Vec<u8>) -> CourierResult<()>;

    /// The terminal artifact archive arrived.
    fn on_artifacts(&mut self, opcode: Opcode, archive: Vec<u8>) -> CourierResult<()>;
}

/// What the first round sends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Start {
    Upload,
    /// A submission is already in flight; ask for its result.
    Query,
}

/// One submission driven through [`SessionState`]
pub struct Session<T, S> {
    transport: T,
    sleeper: S,
    policy: RetryPolicy,
    state: SessionState,
    rounds: u32,
}

impl<T: Transport, S: Sleeper> Session<T, S> {
    pub fn new(transport: T, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            transport,
            sleeper,
            policy,
            state: SessionState::Idle,
            rounds: 0,
        }
    }

    /// Run until the artifacts are handed to `job`. Returns the number of
    /// rounds it took. A session that already ended cannot run again.
    pub fn run<J: Submission>(&mut self, job: &mut J, start: Start) -> CourierResult<u32> {
        if self.state.is_terminal() {
            return Err(CourierError::InvalidState {
                from: self.state.to_string(),
                to: SessionState::Sending.to_string(),
            });
        }
        if self.policy.max_rounds.is_none() {
            info!("no round limit configured, polling until the server answers");
        }

        match self.drive(job, start) {
            Ok(()) => Ok(self.rounds),
            Err(e) => {
                self.state = SessionState::Failed;
                Err(e)
            }
        }
    }

    fn drive<J: Submission>(&mut self, job: &mut J, start: Start) -> CourierResult<()> {
        let mut request = match start {
            Start::Upload => job.upload_request()?,
            Start::Query => job.query_request(),
        };

        loop {
            if !self.policy.allows_round(self.rounds) {
                return Err(CourierError::RetriesExhausted {
                    rounds: self.rounds,
                });
            }

            self.transition_to(SessionState::Sending)?;
            debug!(opcode = %request.opcode(), bytes = request.body().len(), round = self.rounds + 1, "sending");
            self.transport.send(&request)?;
            self.rounds += 1;
            job.on_sent(&request)?;
            self.transition_to(SessionState::AwaitingResponse)?;
            let response = self.transport.receive()?;

            debug!(opcode = %response.opcode(), "response received");
            request = match response {
                Response::Timeout { secs } => self.wait(job, secs)?,
                Response::Info { secs, archive } => {
                    job.on_info(archive)?;
                    self.wait(job, secs)?
                }
                Response::ReUpload => {
                    self.transition_to(SessionState::ReUploadRequested)?;
                    info!("server requested the project again");
                    job.upload_request()?
                }
                Response::Artifacts { opcode, archive } => {
                    self.transition_to(SessionState::Deployed)?;
                    job.on_artifacts(opcode, archive)?;
                    self.transition_to(SessionState::Terminal)?;
                    return Ok(());
                }
            };
        }
    }

    fn wait<J: Submission>(&mut self, job: &J, secs: u8) -> CourierResult<Request> {
        self.transition_to(SessionState::Waiting)?;
        self.sleeper.sleep(self.policy.cap_wait(u64::from(secs)));
        Ok(job.query_request())
    }

    fn transition_to(&mut self, target: SessionState) -> CourierResult<()> {
        if !self.state.can_transition_to(target) {
            return Err(CourierError::InvalidState {
                from: self.state.to_string(),
                to: target.to_string(),
            });
        }
        debug!(state = %target, "{}", target.description());
        self.state = target;
        Ok(())
    }
}
