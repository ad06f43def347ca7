use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::agents::{Agent, classifier, parser, responder};
use crate::config::Config;
use crate::crew::{Crew, CrewError};
use crate::ollama::{OllamaClient, OllamaError};
use crate::types::{ApplicantRecord, Email, Importance, ParseImportanceError, RecordError, Usage};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("email body is empty")]
    EmptyEmail,
    #[error(transparent)]
    Crew(#[from] CrewError),
    #[error(transparent)]
    Label(#[from] ParseImportanceError),
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl PipelineError {
    /// The model-server error underneath, if that is what failed.
    pub fn llm_error(&self) -> Option<&OllamaError> {
        match self {
            PipelineError::Crew(CrewError::Task {
                source: crate::agents::AgentError::Llm(e),
                ..
            }) => Some(e),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Pipeline {
    type Input: Send + Sync;
    type Output: Send + Sync;
    async fn run(&self, input: &Self::Input) -> Result<Self::Output, PipelineError>;
}

fn ensure_body(email: &Email) -> Result<(), PipelineError> {
    if email.is_blank() {
        return Err(PipelineError::EmptyEmail);
    }
    Ok(())
}

/// Classifier alone: one task, one label.
#[derive(Debug, Clone)]
pub struct ClassifyPipeline {
    classifier: Agent,
    verbose: bool,
}

#[async_trait]
impl Pipeline for ClassifyPipeline {
    type Input = Email;
    type Output = Importance;

    async fn run(&self, email: &Email) -> Result<Importance, PipelineError> {
        ensure_body(email)?;
        let crew = Crew::new(vec![classifier::classify_task(self.classifier.clone(), email)])
            .verbose(self.verbose);
        let output = crew.kickoff().await?;
        Ok(output.raw.parse()?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Triage {
    pub importance: Importance,
    /// `None` when the email was rated spam and no reply was drafted.
    pub reply: Option<String>,
    pub token_usage: Usage,
}

/// Classify, then draft a reply conditioned on the label.
#[derive(Debug, Clone)]
pub struct TriagePipeline {
    classifier: Agent,
    responder: Agent,
    verbose: bool,
}

#[async_trait]
impl Pipeline for TriagePipeline {
    type Input = Email;
    type Output = Triage;

    async fn run(&self, email: &Email) -> Result<Triage, PipelineError> {
        ensure_body(email)?;
        let crew = Crew::new(vec![
            classifier::classify_task(self.classifier.clone(), email),
            responder::respond_task(self.responder.clone(), email),
        ])
        .verbose(self.verbose);

        let output = crew.kickoff().await?;
        let label_raw = output.task(0).map(|t| t.raw.as_str()).unwrap_or_default();
        let importance: Importance = label_raw.parse()?;
        let reply = output
            .task(1)
            .filter(|t| !t.skipped)
            .map(|t| t.raw.clone());

        info!(%importance, replied = reply.is_some(), "triage complete");
        Ok(Triage {
            importance,
            reply,
            token_usage: output.token_usage,
        })
    }
}

/// Extract the fixed applicant record from a free-text email.
#[derive(Debug, Clone)]
pub struct ParsePipeline {
    parser: Agent,
    verbose: bool,
}

#[async_trait]
impl Pipeline for ParsePipeline {
    type Input = Email;
    type Output = ApplicantRecord;

    async fn run(&self, email: &Email) -> Result<ApplicantRecord, PipelineError> {
        ensure_body(email)?;
        let crew = Crew::new(vec![parser::parse_task(self.parser.clone(), email)])
            .verbose(self.verbose);
        let output = crew.kickoff().await?;
        Ok(ApplicantRecord::from_model_output(&output.raw)?)
    }
}

/// Builds the model client once and hands out the pipelines.
pub struct Orchestrator {
    client: OllamaClient,
    verbose: bool,
}

impl Orchestrator {
    pub fn new(config: Config, verbose: bool) -> Result<Self, OllamaError> {
        let client = OllamaClient::new(config)?;
        info!(model = client.model(), base_url = %client.config().base_url, "model client ready");
        Ok(Self { client, verbose })
    }

    pub fn classify(&self) -> ClassifyPipeline {
        ClassifyPipeline {
            classifier: classifier::agent(self.client.clone()),
            verbose: self.verbose,
        }
    }

    pub fn triage(&self) -> TriagePipeline {
        TriagePipeline {
            classifier: classifier::agent(self.client.clone()),
            responder: responder::agent(self.client.clone()),
            verbose: self.verbose,
        }
    }

    pub fn parse(&self) -> ParsePipeline {
        ParsePipeline {
            parser: parser::agent(self.client.clone()),
            verbose: self.verbose,
        }
    }
}
