//! Prompt assembly for agent tasks.

use crate::ollama::ChatMessage;

pub const CONTEXT_SEPARATOR: &str = "\n\n----------\n\n";

pub fn system_prompt(role: &str, goal: &str, backstory: &str) -> String {
    format!("You are {role}. {backstory}\nYour personal goal is: {goal}")
}

pub fn task_prompt(description: &str, expected_output: &str, context: Option<&str>) -> String {
    let mut prompt = format!("Current Task: {description}");

    if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str("\n\nThis is the context you're working with:\n");
        prompt.push_str(context);
    }

    prompt.push_str("\n\nThis is the expected criteria for your final answer: ");
    prompt.push_str(expected_output);
    prompt.push_str(
        "\nyou MUST return the actual complete content as the final answer, not a summary.",
    );
    prompt
}

pub fn messages(
    role: &str,
    goal: &str,
    backstory: &str,
    description: &str,
    expected_output: &str,
    context: Option<&str>,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt(role, goal, backstory)),
        ChatMessage::user(task_prompt(description, expected_output, context)),
    ]
}

/// Join prior task outputs the way they are handed to the next task.
pub fn join_context<'a>(outputs: impl IntoIterator<Item = &'a str>) -> String {
    outputs.into_iter().collect::<Vec<_>>().join(CONTEXT_SEPARATOR)
}
