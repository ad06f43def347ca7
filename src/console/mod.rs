use std::path::Path;

use anyhow::{Error, Result};
use serde::Serialize;

use crate::ollama::OllamaError;
use crate::orchestrator::Triage;
use crate::samples::SuiteReport;
use crate::types::{ApplicantRecord, Email};

mod input;
mod render;

/// Terminal front-end: reading emails and rendering results.
pub struct Console;

impl Console {
    pub fn display_welcome(model: &str, base_url: &str) {
        render::display_welcome(model, base_url);
    }

    /// Read an email from `path` (`-` for stdin), or fall back to `demo`.
    pub async fn read_email(path: Option<&Path>, demo: &str) -> Result<Email> {
        input::read_email(path, demo).await
    }

    pub fn display_agent_task(role: &str, description: &str) {
        render::display_agent_task(role, description);
    }

    pub fn display_agent_answer(role: &str, answer: &str) {
        render::display_agent_answer(role, answer);
    }

    pub fn display_skipped_task(role: &str) {
        render::display_skipped_task(role);
    }

    pub fn display_triage(triage: &Triage) {
        render::display_triage(triage);
    }

    pub fn display_record(record: &ApplicantRecord) {
        render::display_record(record);
    }

    pub fn display_report<O: Serialize>(report: &SuiteReport<O>) {
        render::display_report(report);
    }

    pub fn display_error(error: &Error) {
        render::display_error(error);
    }

    pub fn display_ollama_error(error: &OllamaError) {
        render::display_ollama_error(error);
    }
}
