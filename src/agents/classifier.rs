use crate::agents::Agent;
use crate::crew::Task;
use crate::ollama::OllamaClient;
use crate::types::Email;

pub const ROLE: &str = "email classifier";

const GOAL: &str = "accurately classify email based on their importance. give every email strictly one of these ratings: important, casual or spam. No explanation is ever needed for your answer";

const BACKSTORY: &str = "You are an AI assistant whose only job is to classify emails accurately and honestly. Do not be afraid to give emails bad ratings if they are not important. Your job is to help the user manage their inbox.";

const EXPECTED_OUTPUT: &str = "One of these three options: 'important', 'casual', or 'spam'.";

pub fn agent(llm: OllamaClient) -> Agent {
    Agent::new(ROLE, GOAL, BACKSTORY, llm)
}

pub fn classify_task(agent: Agent, email: &Email) -> Task {
    Task::new(
        format!("Classify the following email: '{}'", email),
        EXPECTED_OUTPUT,
        agent,
    )
}
