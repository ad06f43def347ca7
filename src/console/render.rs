use anyhow::Error;
use colored::*;
use serde::Serialize;

use crate::ollama::OllamaError;
use crate::orchestrator::{PipelineError, Triage};
use crate::samples::SuiteReport;
use crate::types::{ApplicantRecord, Importance};

pub fn display_welcome(model: &str, base_url: &str) {
    println!("{}", "📬 Email Crew".bright_blue().bold());
    println!(
        "{} {} {}",
        "Using model".blue(),
        model.bright_white(),
        format!("at {}", base_url).blue()
    );
    println!();
}

pub fn display_agent_task(role: &str, description: &str) {
    println!("{} {}", "# Agent:".bright_purple().bold(), role.bright_green());
    println!("{} {}\n", "## Task:".purple(), description.white());
}

pub fn display_agent_answer(role: &str, answer: &str) {
    println!("{} {}", "# Agent:".bright_purple().bold(), role.bright_green());
    println!("{}\n{}\n", "## Final Answer:".purple(), answer.bright_white());
}

pub fn display_skipped_task(role: &str) {
    println!(
        "{} {}\n",
        "⏭️  Skipping task for".bright_yellow(),
        role.bright_green()
    );
}

pub fn display_triage(triage: &Triage) {
    let label = match triage.importance {
        Importance::Important => triage.importance.as_str().bright_red().bold(),
        Importance::Casual => triage.importance.as_str().bright_green().bold(),
        Importance::Spam => triage.importance.as_str().bright_black().bold(),
    };

    println!("\n{}", "📋 Triage:".bright_green().bold());
    println!(
        "{}",
        "┌─────────────────────────────────────────────────────────────".green()
    );
    println!("{} {}", "│ 🏷️  Importance:".green(), label);
    match &triage.reply {
        Some(reply) => println!("{} {}", "│ ✉️  Reply:".green(), reply.white()),
        None => println!("{} {}", "│ ✉️  Reply:".green(), "(ignored)".bright_black()),
    }
    println!(
        "{} {}",
        "│ 🔢 Tokens:".green(),
        triage.token_usage.total().to_string().white()
    );
    println!(
        "{}",
        "└─────────────────────────────────────────────────────────────\n".green()
    );
}

pub fn display_record(record: &ApplicantRecord) {
    println!("\n{}", "📋 Parsed record:".bright_green().bold());
    println!(
        "{}",
        "┌─────────────────────────────────────────────────────────────".green()
    );
    println!("{} {}", "│ 👤 Sender Name:".green(), record.sender_name.to_string().bright_white().bold());
    println!("{} {}", "│ 🏠 House Address:".green(), record.house_address.to_string().white());
    println!(
        "{} {}",
        "│ 💼 Years of Work Experience:".green(),
        record.years_of_experience.to_string().white()
    );
    println!(
        "{} {}",
        "│ 🎓 Highest Education Qualification:".green(),
        record.qualification.to_string().white()
    );
    println!("{} {}", "│ 🎂 Age:".green(), record.age.to_string().white());
    println!(
        "{}",
        "└─────────────────────────────────────────────────────────────\n".green()
    );
}

fn compact<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<unprintable>".to_string())
}

pub fn display_report<O: Serialize>(report: &SuiteReport<O>) {
    println!("\n{} {}", "🧪 Suite:".bright_blue().bold(), report.name.bright_white());
    let total = report.outcomes.len();
    for outcome in &report.outcomes {
        let status = if outcome.passed { "PASS".bright_green().bold() } else { "FAIL".bright_red().bold() };
        println!("  {} case {} of {}", status, outcome.index, total);
        if !outcome.passed {
            println!("    {} {}", "expected:".yellow(), compact(&outcome.expected));
            match (&outcome.actual, &outcome.error) {
                (Some(actual), _) => println!("    {} {}", "actual:  ".yellow(), compact(actual)),
                (None, Some(error)) => println!("    {} {}", "error:   ".red(), error),
                (None, None) => {}
            }
        }
    }

    let summary = format!("{}/{} passed", report.passed(), total);
    if report.is_success() {
        println!("{}\n", summary.bright_green().bold());
    } else {
        println!("{}\n", summary.bright_red().bold());
    }
}

pub fn display_error(error: &Error) {
    let llm_error = error
        .downcast_ref::<OllamaError>()
        .or_else(|| error.downcast_ref::<PipelineError>().and_then(|e| e.llm_error()));

    if let Some(llm_error) = llm_error {
        display_ollama_error(llm_error);
    } else {
        println!(
            "{} {}",
            "❌ Error:".bright_red().bold(),
            error.to_string().red()
        );
        println!(
            "{}",
            "Please check your configuration and try again.\n".red()
        );
    }
}

pub fn display_ollama_error(error: &OllamaError) {
    let user_message = error.user_message();
    match error {
        OllamaError::ServerBusy => {
            println!("{}", user_message.bright_yellow().bold());
            println!(
                "{}",
                "💡 Tip: Another request may be holding the model. Try again shortly.".yellow()
            );
        }
        OllamaError::NetworkError { .. } => {
            println!("{}", user_message.bright_red().bold());
            println!(
                "{}",
                "💡 Tip: Start the server with `ollama serve` or set EMAIL_CREW_BASE_URL.".red()
            );
        }
        OllamaError::Timeout { .. } => {
            println!("{}", user_message.bright_yellow().bold());
            println!(
                "{}",
                "💡 Tip: Raise EMAIL_CREW_TIMEOUT_SECS for slow hardware.".yellow()
            );
        }
        OllamaError::ModelNotFound { model } => {
            println!("{}", user_message.bright_red().bold());
            println!(
                "{}",
                format!("💡 Tip: Run `ollama pull {}` or pick another --model.", model).red()
            );
        }
        OllamaError::ApiError { message, .. } => {
            println!("{}", user_message.bright_red().bold());
            println!("{} {}", "💡 Server said:".red(), message.red());
        }
        OllamaError::ParseError { .. } => {
            println!("{}", user_message.bright_magenta().bold());
            println!(
                "{}",
                "💡 Tip: The server answered in an unexpected shape. Check its version.".magenta()
            );
        }
        OllamaError::ConfigError { .. } => {
            println!("{}", user_message.bright_red().bold());
            println!(
                "{}",
                "💡 Tip: Check your EMAIL_CREW_* environment variables and flags.".red()
            );
        }
    }
    println!();
}
