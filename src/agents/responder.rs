use crate::agents::Agent;
use crate::crew::{Task, TaskOutput};
use crate::ollama::OllamaClient;
use crate::types::{Email, Importance};

pub const ROLE: &str = "email responder";

const GOAL: &str = "Based on the importance of the email, write a concise and simple response. If the email is rated 'important' write a formal response, if the email is rated 'casual' write a casual response, and if the email is rated 'spam' ignore the email. Be very concise.";

const BACKSTORY: &str = "You are an AI assistant whose only job is to write short responses to emails based on their importance. The importance will be provided to you by the 'classifier' agent.";

const EXPECTED_OUTPUT: &str = "A very concise response to the email based on the importance provided by the 'classifier' agent.";

pub fn agent(llm: OllamaClient) -> Agent {
    Agent::new(ROLE, GOAL, BACKSTORY, llm)
}

/// Reply task; runs only after an `important` or `casual` rating.
pub fn respond_task(agent: Agent, email: &Email) -> Task {
    Task::new(
        format!(
            "Respond to the email: '{}' based on the importance provided by the 'classifier' agent",
            email
        ),
        EXPECTED_OUTPUT,
        agent,
    )
    .with_condition(worth_answering)
}

fn worth_answering(previous: &TaskOutput) -> bool {
    matches!(
        previous.raw.parse::<Importance>(),
        Ok(Importance::Important | Importance::Casual)
    )
}
