use crate::agents::Agent;
use crate::crew::Task;
use crate::ollama::{OllamaClient, OutputFormat};
use crate::types::Email;

pub const ROLE: &str = "email data parser";

const GOAL: &str = r#"Extract structured information from the unstructured email text. Specifically, extract the following fields:
- Sender Name: The name of the person sending the email.
- House Address: The full house address provided in the email.
- Years of Work Experience: Total number of years of work experience mentioned.
- Highest Education Qualification: The highest educational qualification provided.
- Age: The age of the sender.
Return the extracted data in the following JSON format:
{"Sender Name": "<extracted name>", "House Address": "<extracted address>", "Years of Work Experience": <extracted years>, "Highest Education Qualification": "<extracted qualification>", "Age": <extracted age>}
Ensure all fields are filled, and provide 'N/A' for any missing data. Ensure strict JSON formatting without newlines or unnecessary spaces."#;

const BACKSTORY: &str = "You are an expert AI email parser, designed to extract and organize specific information accurately.";

const EXPECTED_OUTPUT: &str = r#"JSON format:
{"Sender Name": "<Full Name>", "House Address": "<full address>", "Years of Work Experience": <number>, "Highest Education Qualification": "<qualification>", "Age": <number>}"#;

pub fn agent(llm: OllamaClient) -> Agent {
    Agent::new(ROLE, GOAL, BACKSTORY, llm)
}

pub fn parse_task(agent: Agent, email: &Email) -> Task {
    Task::new(format!("Parse the following email: '{}'", email), EXPECTED_OUTPUT, agent)
        .with_output_format(OutputFormat::Json)
}
