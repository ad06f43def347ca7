use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Sentinel the parser agent is told to emit for missing data.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email {
    pub body: String,
}

impl Email {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty()
    }
}

impl From<&str> for Email {
    fn from(body: &str) -> Self {
        Self::new(body)
    }
}

impl From<String> for Email {
    fn from(body: String) -> Self {
        Self::new(body)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Important,
    Casual,
    Spam,
}

impl Importance {
    pub const ALL: [Importance; 3] = [Importance::Important, Importance::Casual, Importance::Spam];

    pub fn as_str(self) -> &'static str {
        match self {
            Importance::Important => "important",
            Importance::Casual => "casual",
            Importance::Spam => "spam",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("model answered {0:?}, expected one of: important, casual, spam")]
pub struct ParseImportanceError(pub String);

impl FromStr for Importance {
    type Err = ParseImportanceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let cleaned = raw
            .trim_matches(|c: char| {
                c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '*' | '.' | '!' | ',')
            })
            .to_lowercase();

        if let Some(label) = Importance::ALL.into_iter().find(|l| l.as_str() == cleaned) {
            return Ok(label);
        }

        // Tolerate "Rating: important" style answers: one distinct label, never
        // negated, given as the last word or right after a marker.
        let words: Vec<&str> = cleaned
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|w| w.trim_matches('\''))
            .filter(|w| !w.is_empty())
            .collect();

        let mut label = None;
        let mut anchored = false;
        for (i, word) in words.iter().enumerate() {
            let Some(found) = Importance::ALL.into_iter().find(|l| l.as_str() == *word) else {
                continue;
            };
            let previous = i.checked_sub(1).map(|j| words[j]);
            if previous.is_some_and(|p| NEGATIONS.contains(&p)) {
                return Err(ParseImportanceError(raw.to_string()));
            }
            match label {
                Some(existing) if existing != found => {
                    return Err(ParseImportanceError(raw.to_string()));
                }
                _ => label = Some(found),
            }
            anchored |= i + 1 == words.len() || previous.is_some_and(|p| MARKERS.contains(&p));
        }

        match label {
            Some(label) if anchored => Ok(label),
            _ => Err(ParseImportanceError(raw.to_string())),
        }
    }
}

const NEGATIONS: [&str; 6] = ["not", "no", "isn't", "isnt", "never", "nor"];
const MARKERS: [&str; 5] = ["rating", "label", "classification", "category", "rated"];

/// A record field that may carry the `"N/A"` sentinel instead of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Value(T),
    NotAvailable,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::NotAvailable
    }
}

impl<T> Field<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Field::Value(_))
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Value(value)
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Value(v) => v.fmt(f),
            Field::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Value(v) => v.serialize(serializer),
            Field::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        match &value {
            JsonValue::Null => return Ok(Field::NotAvailable),
            JsonValue::String(s) if s.trim().eq_ignore_ascii_case(NOT_AVAILABLE) => {
                return Ok(Field::NotAvailable);
            }
            _ => {}
        }

        match serde_json::from_value::<T>(value.clone()) {
            Ok(v) => Ok(Field::Value(v)),
            // numbers sometimes come back quoted
            Err(first) => match &value {
                JsonValue::String(s) => serde_json::from_str::<T>(s.trim())
                    .map(Field::Value)
                    .map_err(|_| serde::de::Error::custom(first)),
                _ => Err(serde::de::Error::custom(first)),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("model output contains no JSON object: {0:?}")]
    NoJsonObject(String),
    #[error("model output is not a valid record: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// The fixed schema the parser agent fills in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApplicantRecord {
    #[serde(rename = "Sender Name", default)]
    pub sender_name: Field<String>,
    #[serde(rename = "House Address", default)]
    pub house_address: Field<String>,
    #[serde(rename = "Years of Work Experience", default)]
    pub years_of_experience: Field<u32>,
    #[serde(rename = "Highest Education Qualification", default)]
    pub qualification: Field<String>,
    #[serde(rename = "Age", default)]
    pub age: Field<u32>,
}

impl ApplicantRecord {
    pub fn from_model_output(raw: &str) -> Result<Self, RecordError> {
        let object = extract_json_object(raw)
            .ok_or_else(|| RecordError::NoJsonObject(raw.to_string()))?;
        Ok(serde_json::from_str(object)?)
    }
}

/// Slice from the first `{` to the last `}`; strips fences and chatter around a JSON object.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl Usage {
    pub fn total(&self) -> u32 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

impl AddAssign for Usage {
    fn add_assign(&mut self, rhs: Self) {
        self.prompt_tokens = self.prompt_tokens.saturating_add(rhs.prompt_tokens);
        self.completion_tokens = self.completion_tokens.saturating_add(rhs.completion_tokens);
    }
}
