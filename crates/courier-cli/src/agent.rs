//! The submission job run by the binary

use courier::description::{self, is_in_flight};
use courier::{
    AgentConfig, CourierError, CourierResult, DeployReport, Deployer, DescriptionProject,
    Endpoint, Frontend, Opcode, Packager, Request, SOURCE_EXTENSION, Session, Start, Submission,
    ThreadSleeper, Validator, connect, from_config,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Informational document name in the workspace
const INFO_DOCUMENT: &str = "unirail.info";

/// How a finished job ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The description was replaced by the server's version
    Rewritten { backup: PathBuf },
    /// A conversion input produced this description file
    Converted { output: PathBuf },
}

/// Submission of one description file
pub struct DescriptionJob<'a> {
    config: &'a AgentConfig,
    description: PathBuf,
    workspace: PathBuf,
    project: DescriptionProject,
    frontend: Box<dyn Frontend>,
    packager: Packager,
    completion: Option<Completion>,
}

impl<'a> DescriptionJob<'a> {
    pub fn new(config: &'a AgentConfig, description: &Path, workspace: &Path) -> CourierResult<Self> {
        let project = DescriptionProject::from_file(config.login.clone(), description)?;

        fs::create_dir_all(workspace)?;
        let workspace = workspace.canonicalize()?;
        let description = description.canonicalize()?;
        if workspace.join(project.file_name()) == description {
            return Err(CourierError::Config(format!(
                "workspace {} holds the description file itself, choose another workspace",
                workspace.display()
            )));
        }

        Ok(Self {
            frontend: from_config(&config.frontend, &config.search_path),
            packager: Packager::new(config.search_path.clone()),
            config,
            description,
            workspace,
            project,
            completion: None,
        })
    }

    pub fn project(&self) -> &DescriptionProject {
        &self.project
    }

    pub fn completion(&self) -> Option<&Completion> {
        self.completion.as_ref()
    }

    /// Where a conversion's output lands
    fn converted_path(&self) -> PathBuf {
        self.workspace
            .join(format!("{}.{SOURCE_EXTENSION}", self.project.stem()))
    }

    /// Remove output of an earlier run that would be mistaken for a new one.
    pub fn clean_workspace(&self) -> CourierResult<()> {
        let stale = [
            self.workspace.join(INFO_DOCUMENT),
            self.workspace.join(self.project.file_name()),
            self.converted_path(),
        ];
        for path in stale.iter().filter(|p| p.is_file()) {
            fs::remove_file(path)?;
            debug!(file = %path.display(), "removed stale workspace file");
        }
        Ok(())
    }

    fn unpack(&self, archive: Vec<u8>) -> CourierResult<DeployReport> {
        let report = Deployer::new(&self.workspace, self.config).deploy(archive)?;
        if report.has_notices() {
            print!("{}", report.render());
        }
        for document in &report.info_documents {
            match fs::read_to_string(document) {
                Ok(text) => println!("{}", text.trim_end()),
                Err(e) => tracing::warn!(file = %document.display(), error = %e, "cannot read info document"),
            }
        }
        Ok(report)
    }
}

impl Submission for DescriptionJob<'_> {
    fn upload_request(&mut self) -> CourierResult<Request> {
        description::clear_in_flight(&self.description)?;

        if self.project.is_conversion() {
            let packed = self
                .packager
                .package_conversion(&self.project, &self.description)?;
            return Ok(Request::upload(Opcode::ProtoFile, packed.bytes));
        }

        let model = self.frontend.symbol_model(&self.description)?;
        let report = Validator::validate(&model)?.into_result()?;
        info!(channels = report.channels, "description is valid");

        let packed = self.packager.package_description(
            &self.project,
            &self.description,
            &model,
            &report.constants,
        )?;
        Ok(Request::upload(Opcode::DescriptorFile, packed.bytes))
    }

    fn query_request(&self) -> Request {
        Request::query(&self.project.identifier())
    }

    fn on_sent(&mut self, request: &Request) -> CourierResult<()> {
        if !request.is_query() {
            description::mark_in_flight(&self.description)?;
        }
        Ok(())
    }

    fn on_info(&mut self, archive: Vec<u8>) -> CourierResult<()> {
        self.unpack(archive)?;
        Ok(())
    }

    fn on_artifacts(&mut self, opcode: Opcode, archive: Vec<u8>) -> CourierResult<()> {
        let report = self.unpack(archive)?;
        info!(files = report.written.len(), copied = report.copied, "artifacts received");

        let completion = if opcode == Opcode::ProtoFile || self.project.is_conversion() {
            let output = self.converted_path();
            if !output.is_file() {
                return Err(CourierError::ArtifactMissing(output));
            }
            description::clear_in_flight(&self.description)?;
            Completion::Converted { output }
        } else {
            let generated = self.workspace.join(self.project.file_name());
            let backup = description::rewrite(&self.description, &generated)?;
            Completion::Rewritten { backup }
        };

        self.completion = Some(completion);
        Ok(())
    }
}

/// Run a complete submission of `description`.
pub fn submit(config: &AgentConfig, description: &Path, workspace: &Path) -> CourierResult<()> {
    if !description.is_file() {
        return Err(CourierError::InputUnavailable(format!(
            "{} not found",
            description.display()
        )));
    }
    if description::is_up_to_date(description)? {
        println!("{} is up to date, nothing to submit", description.display());
        return Err(CourierError::InputUnavailable(format!(
            "{} is already up to date",
            description.display()
        )));
    }

    let mut job = DescriptionJob::new(config, description, workspace)?;
    job.clean_workspace()?;

    let start = if is_in_flight(description)? {
        info!("a submission is in flight, asking for its result");
        Start::Query
    } else {
        Start::Upload
    };

    let transport = connect(&Endpoint::parse(&config.server)?, config.read_timeout())?;
    let rounds = Session::new(transport, ThreadSleeper, config.retry).run(&mut job, start)?;
    debug!(rounds, project = %job.project().identifier(), "session finished");

    match job.completion() {
        Some(Completion::Rewritten { backup }) => {
            println!("Find generated files in {}", job.workspace.display());
            println!("Previous description saved as {}", backup.display());
        }
        Some(Completion::Converted { output }) => {
            println!("Converted description written to {}", output.display());
        }
        None => {}
    }
    Ok(())
}
