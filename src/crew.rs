use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::agents::{Agent, AgentError};
use crate::console::Console;
use crate::ollama::OutputFormat;
use crate::prompt;
use crate::types::Usage;

pub type Condition = Arc<dyn Fn(&TaskOutput) -> bool + Send + Sync>;

#[derive(Debug, Error)]
pub enum CrewError {
    #[error("crew has no tasks")]
    NoTasks,
    #[error("the first task of a crew cannot be conditional")]
    ConditionalFirstTask,
    #[error("task {index} ({role}) failed: {source}")]
    Task {
        index: usize,
        role: String,
        #[source]
        source: AgentError,
    },
}

/// A unit of work: a prompt plus the expected-output description, bound to an agent.
#[derive(Clone)]
pub struct Task {
    pub id: Uuid,
    pub description: String,
    pub expected_output: String,
    pub agent: Agent,
    pub output_format: OutputFormat,
    condition: Option<Condition>,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("agent", &self.agent.role)
            .field("output_format", &self.output_format)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: Agent,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
            output_format: OutputFormat::Text,
            condition: None,
        }
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Run this task only when `condition` holds for the previous task's output.
    pub fn with_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&TaskOutput) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }

    fn should_run(&self, previous: Option<&TaskOutput>) -> bool {
        match (&self.condition, previous) {
            (Some(condition), Some(previous)) => condition(previous),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskOutput {
    pub task_id: Uuid,
    pub description: String,
    pub agent: String,
    pub raw: String,
    pub skipped: bool,
    pub usage: Usage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewOutput {
    /// Raw output of the last task; empty when it was skipped.
    pub raw: String,
    pub tasks_output: Vec<TaskOutput>,
    pub token_usage: Usage,
}

impl CrewOutput {
    pub fn task(&self, index: usize) -> Option<&TaskOutput> {
        self.tasks_output.get(index)
    }
}

/// Runs its tasks one after another, feeding earlier answers to later tasks as context.
#[derive(Debug, Clone)]
pub struct Crew {
    tasks: Vec<Task>,
    verbose: bool,
}

impl Crew {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks, verbose: false }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn validate(&self) -> Result<(), CrewError> {
        match self.tasks.first() {
            None => Err(CrewError::NoTasks),
            Some(first) if first.is_conditional() => Err(CrewError::ConditionalFirstTask),
            Some(_) => Ok(()),
        }
    }

    pub async fn kickoff(&self) -> Result<CrewOutput, CrewError> {
        self.validate()?;

        let run_id = Uuid::new_v4();
        info!(%run_id, tasks = self.tasks.len(), "crew kickoff");

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        let mut token_usage = Usage::default();

        for (index, task) in self.tasks.iter().enumerate() {
            let verbose = self.verbose || task.agent.verbose;

            if !task.should_run(outputs.last()) {
                info!(%run_id, index, role = %task.agent.role, "condition not met, skipping task");
                if verbose {
                    Console::display_skipped_task(&task.agent.role);
                }
                outputs.push(TaskOutput {
                    task_id: task.id,
                    description: task.description.clone(),
                    agent: task.agent.role.clone(),
                    raw: String::new(),
                    skipped: true,
                    usage: Usage::default(),
                });
                continue;
            }

            let context = prompt::join_context(
                outputs.iter().filter(|o| !o.skipped).map(|o| o.raw.as_str()),
            );

            if verbose {
                Console::display_agent_task(&task.agent.role, &task.description);
            }

            let result = task
                .agent
                .execute_task(task, Some(context.as_str()))
                .await
                .map_err(|source| {
                    warn!(%run_id, index, role = %task.agent.role, error = %source, "task failed");
                    CrewError::Task {
                        index,
                        role: task.agent.role.clone(),
                        source,
                    }
                })?;

            if verbose {
                Console::display_agent_answer(&task.agent.role, &result.raw);
            }

            token_usage += result.usage;
            outputs.push(TaskOutput {
                task_id: task.id,
                description: task.description.clone(),
                agent: task.agent.role.clone(),
                raw: result.raw,
                skipped: false,
                usage: result.usage,
            });
        }

        let raw = outputs.last().map(|o| o.raw.clone()).unwrap_or_default();
        info!(%run_id, total_tokens = token_usage.total(), "crew finished");

        Ok(CrewOutput {
            raw,
            tasks_output: outputs,
            token_usage,
        })
    }
}
