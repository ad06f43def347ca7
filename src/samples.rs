//! Hardcoded sample emails with their expected labels and records, and a
//! runner that checks a pipeline against them.

use std::fmt::Debug;

use serde::Serialize;
use tracing::{info, warn};

use crate::orchestrator::Pipeline;
use crate::types::{ApplicantRecord, Email, Field, Importance};

pub const DEMO_TRIAGE_EMAIL: &str = "nigrian price sending som gold";

pub const DEMO_PARSE_EMAIL: &str = "Dear [HR Manager's Name],

I am writing to submit the requested details regarding my work experience and personal information. Please find them below:

Years of Work Experience: 7 years
House Address: 123 Elm Street, Apartment 4B, Springfield, IL 62704
Highest Education Qualification: Master’s Degree in Business Administration (MBA)
Age: 32
Please let me know if you require any further details.

Best regards,
John
[Employee ID, if applicable]";

#[derive(Debug, Clone)]
pub struct Case<I, O> {
    pub input: I,
    pub expected: O,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseOutcome<O> {
    pub index: usize,
    pub expected: O,
    pub actual: Option<O>,
    pub error: Option<String>,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport<O> {
    pub name: String,
    pub outcomes: Vec<CaseOutcome<O>>,
}

impl<O> SuiteReport<O> {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome<O>> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }
}

/// Run every case; a failing case is recorded and the suite moves on.
pub async fn run_suite<P>(
    name: &str,
    pipeline: &P,
    cases: &[Case<P::Input, P::Output>],
) -> SuiteReport<P::Output>
where
    P: Pipeline + Sync,
    P::Output: PartialEq + Clone + Debug,
{
    let mut outcomes = Vec::with_capacity(cases.len());

    for (i, case) in cases.iter().enumerate() {
        let index = i + 1;
        let outcome = match pipeline.run(&case.input).await {
            Ok(actual) => {
                let passed = actual == case.expected;
                if !passed {
                    warn!(suite = name, index, expected = ?case.expected, actual = ?actual, "case mismatch");
                }
                CaseOutcome {
                    index,
                    expected: case.expected.clone(),
                    actual: Some(actual),
                    error: None,
                    passed,
                }
            }
            Err(e) => {
                warn!(suite = name, index, error = %e, "case errored");
                CaseOutcome {
                    index,
                    expected: case.expected.clone(),
                    actual: None,
                    error: Some(e.to_string()),
                    passed: false,
                }
            }
        };
        outcomes.push(outcome);
    }

    let report = SuiteReport { name: name.to_string(), outcomes };
    info!(suite = name, passed = report.passed(), total = report.outcomes.len(), "suite finished");
    report
}

pub fn classification_cases() -> Vec<Case<Email, Importance>> {
    let cases = [
        (
            "Dear Team,
The submission deadline for the Q4 Financial Report has been extended to December 18, 2024.
Please ensure all updates and approvals are completed by this new date. Let me know if there are any issues meeting this deadline.

Best regards,
Sarah Cooper
CFO, Finance Department",
            Importance::Important,
        ),
        (
            "Hi John,
Attached is the latest version of the partnership agreement. Please review the terms highlighted on page 5 and provide your feedback by EOD tomorrow. Let me know if you have any questions.
Best,
Jonathan Marks
Legal Counsel",
            Importance::Important,
        ),
        (
            "Hey John,
Are you free for lunch tomorrow? Let’s catch up! I was thinking about trying that new Thai place near the office. Let me know what works for you.
Cheers,
Emily",
            Importance::Casual,
        ),
        (
            "Hi John,
Hope you’re doing well! Any fun plans for the weekend? I was thinking about organizing a hiking trip to Blue Ridge Park if the weather holds up. Would love to have you join! Let me know if you’re interested.
Best,
Mike",
            Importance::Casual,
        ),
        (
            "Congratulations!
You've been selected for a chance to receive a brand-new La Vie Est Belle Eau De Perfum! To claim your reward,
simply answer a few quick questions about your experience with us.

Limited time offer for our customers!


Celebrate Life's Beautiful Moments!
Your La Vie Est Belle Eau De Perfum Awaits

THE FRAGRANCE OF HAPPINESS. Life is what you make of it so make it beautiful with La vie est belle — the iconic women's fragrance by Lancôme.
A floral gourmand bouquet encapsulated in a crystal smile. Blending the most noble ingredients,
La vie est belle is an unforgettable fragrance. Precious Iris accord with vibrant earthy notes of patchouli,
sensual warm vanilla and spun sugar are combined in this scent exclusively created by two of the most renowned French perfumers —
Anne Flipo and Dominique Ropion. The art of French perfumery manifested in a unique bottle shape that symbolizes a smile. Each spray will unlock a beautiful day.",
            Importance::Spam,
        ),
        (
            "Hi John,
Congratulations! You’ve been selected to receive a FREE $500 Amazon Gift Card. To claim your reward, simply click the link below and complete the quick survey.
Click here to claim your gift.
Don’t miss out—this offer is only valid for the next 24 hours!
Regards,
The Rewards Team",
            Importance::Spam,
        ),
    ];

    cases
        .into_iter()
        .map(|(body, expected)| Case { input: Email::new(body), expected })
        .collect()
}

fn record(name: &str, address: &str, years: u32, qualification: &str, age: u32) -> ApplicantRecord {
    ApplicantRecord {
        sender_name: Field::Value(name.to_string()),
        house_address: Field::Value(address.to_string()),
        years_of_experience: Field::Value(years),
        qualification: Field::Value(qualification.to_string()),
        age: Field::Value(age),
    }
}

pub fn parsing_cases() -> Vec<Case<Email, ApplicantRecord>> {
    vec![
        Case {
            input: Email::new(
                "Dear HR Manager,
I am submitting my details as requested:
- Years of Work Experience: 10
- Address: 456 Oak Street, Denver, CO, 80201
- Qualification: PhD in Data Science
- Age: 45

Best, John Doe",
            ),
            expected: record("John Doe", "456 Oak Street, Denver, CO, 80201", 10, "PhD in Data Science", 45),
        },
        Case {
            input: Email::new(
                "Hello Team,
Here’s my information:
Work Experience: 5 years
Address: 789 Pine Lane, Apt 3A, Seattle, WA, 98101
Education: Master’s in Mechanical Engineering
Age: 29
Regards, Jane Smith",
            ),
            expected: record(
                "Jane Smith",
                "789 Pine Lane, Apt 3A, Seattle, WA, 98101",
                5,
                "Master’s in Mechanical Engineering",
                29,
            ),
        },
        Case {
            input: Email::new(
                "Dear HR Team,

I have 10 years of experience working in marketing and advertising. My current address is 123 Greenway Blvd, Apt 7C, Portland, OR, 97204. I hold a Bachelor’s degree in Business Administration, and I am 34 years old.

Best regards,
Sophia Lee",
            ),
            expected: record(
                "Sophia Lee",
                "123 Greenway Blvd, Apt 7C, Portland, OR, 97204",
                10,
                "Bachelor’s degree in Business Administration",
                34,
            ),
        },
        Case {
            input: Email::new(
                "Hi HR,

Thank you for your email, I hope you are doing fine and I am so excited to join the team.
I am currently 45 years old. I have been teaching high school Biology for 12 years. I live at 89 Sunset Drive, San Diego, CA, 92109.
My highest qualification is a Master’s degree in Biology.
Hope to get your reply soon!!!!

Thanks,
Laura Simmons",
            ),
            expected: record(
                "Laura Simmons",
                "89 Sunset Drive, San Diego, CA, 92109",
                12,
                "Master’s degree in Biology",
                45,
            ),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_sets_cover_every_label() {
        let cases = classification_cases();
        assert_eq!(cases.len(), 6);
        for label in Importance::ALL {
            assert_eq!(cases.iter().filter(|c| c.expected == label).count(), 2);
        }
        assert!(cases.iter().all(|c| !c.input.is_blank()));
    }

    #[test]
    fn parsing_samples_are_fully_populated() {
        let cases = parsing_cases();
        assert_eq!(cases.len(), 4);
        for case in &cases {
            let r = &case.expected;
            assert!(r.sender_name.is_available());
            assert!(r.house_address.is_available());
            assert!(r.years_of_experience.is_available());
            assert!(r.qualification.is_available());
            assert!(r.age.is_available());
        }
    }

    #[test]
    fn report_counts() {
        let report = SuiteReport {
            name: "t".to_string(),
            outcomes: vec![
                CaseOutcome { index: 1, expected: 1, actual: Some(1), error: None, passed: true },
                CaseOutcome {
                    index: 2,
                    expected: 2,
                    actual: None,
                    error: Some("boom".to_string()),
                    passed: false,
                },
            ],
        };
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failures().count(), 1);
        assert!(!report.is_success());
    }
}
