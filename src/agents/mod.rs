use tracing::info;

use crate::crew::Task;
use crate::ollama::{OllamaClient, OllamaError};
use crate::prompt;
use crate::types::Usage;

pub mod classifier;
pub mod parser;
pub mod responder;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] OllamaError),
}

/// Raw answer of one agent for one task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResult {
    pub raw: String,
    pub usage: Usage,
}

/// A role/goal/backstory persona bound to a model client.
#[derive(Debug, Clone)]
pub struct Agent {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub verbose: bool,
    llm: OllamaClient,
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        llm: OllamaClient,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            verbose: false,
            llm,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub async fn execute_task(
        &self,
        task: &Task,
        context: Option<&str>,
    ) -> Result<TaskResult, AgentError> {
        let messages = prompt::messages(
            &self.role,
            &self.goal,
            &self.backstory,
            &task.description,
            &task.expected_output,
            context,
        );

        info!(role = %self.role, task_id = %task.id, model = self.llm.model(), "agent working on task");
        let completion = self.llm.chat(&messages, task.output_format).await?;

        info!(
            role = %self.role,
            prompt_tokens = completion.usage.prompt_tokens,
            completion_tokens = completion.usage.completion_tokens,
            "agent finished task"
        );

        Ok(TaskResult {
            raw: completion.content.trim().to_string(),
            usage: completion.usage,
        })
    }
}
