//! Email triage and parsing agents backed by a local model server.
//!
//! Agents are role/goal/backstory personas; a [`crew::Crew`] runs their tasks
//! in order, handing earlier answers to later tasks as context. The
//! [`orchestrator`] wires the fixed pipelines: classify then reply, and
//! structured-field extraction.

pub mod agents;
pub mod config;
pub mod console;
pub mod crew;
pub mod ollama;
pub mod orchestrator;
pub mod prompt;
pub mod samples;
pub mod types;
