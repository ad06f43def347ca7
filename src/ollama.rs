use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::types::Usage;

/// Error types for calls to the local model server
#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("Model server is currently busy. Please try again in a few moments.")]
    ServerBusy,

    #[error("Network connection failed: {message}")]
    NetworkError { message: String },

    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Model '{model}' is not available on the server")]
    ModelNotFound { model: String },

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {message}")]
    ParseError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl OllamaError {
    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            OllamaError::ServerBusy => {
                "🚫 The model server is busy. Please try again in a few moments.".to_string()
            }
            OllamaError::NetworkError { .. } => {
                "🌐 Could not reach the model server. Is it running?".to_string()
            }
            OllamaError::Timeout { seconds } => {
                format!(
                    "⏰ Request timed out after {} seconds. The model might still be loading.",
                    seconds
                )
            }
            OllamaError::ModelNotFound { model } => {
                format!("📦 Model '{}' is not installed on the server.", model)
            }
            OllamaError::ApiError { status, .. } => {
                format!("❌ Model server error ({}). Please try again later.", status)
            }
            OllamaError::ParseError { .. } => {
                "⚠️ Failed to parse the model server response.".to_string()
            }
            OllamaError::ConfigError { message } => {
                format!("⚙️ Configuration error: {}", message)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Shape of the answer requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatMessage>,
    #[serde(default)]
    prompt_eval_count: u32,
    #[serde(default)]
    eval_count: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Assistant answer plus the token counts the server reported.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    pub content: String,
    pub usage: Usage,
}

/// Client for the `/api/chat` endpoint of a local model server
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    config: Config,
}

impl fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

impl OllamaClient {
    pub fn new(config: Config) -> Result<Self, OllamaError> {
        config.validate().map_err(|e| OllamaError::ConfigError {
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("email_crew/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OllamaError::ConfigError {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send one non-streaming chat request and return the assistant content.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        format: OutputFormat,
    ) -> Result<ChatCompletion, OllamaError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            stream: false,
            format: match format {
                OutputFormat::Json => Some("json"),
                OutputFormat::Text => None,
            },
            options: ChatOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            ?format,
            "sending chat request"
        );

        let response = self
            .client
            .post(format!("{}/api/chat", self.config.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_response(status, response).await);
        }

        let body: ChatResponse = response.json().await.map_err(|e| OllamaError::ParseError {
            message: format!("Failed to parse API response: {}", e),
        })?;

        let content = body
            .message
            .map(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| OllamaError::ParseError {
                message: "Empty message in API response".to_string(),
            })?;

        Ok(ChatCompletion {
            content,
            usage: Usage {
                prompt_tokens: body.prompt_eval_count,
                completion_tokens: body.eval_count,
            },
        })
    }

    /// Map reqwest errors to our custom error types
    fn map_reqwest_error(&self, error: reqwest::Error) -> OllamaError {
        if error.is_timeout() {
            return OllamaError::Timeout {
                seconds: self.config.timeout,
            };
        }

        if error.is_connect() {
            return OllamaError::NetworkError {
                message: format!("Failed to connect to {}", self.config.base_url),
            };
        }

        if error.is_request() {
            return OllamaError::NetworkError {
                message: "Request failed".to_string(),
            };
        }

        OllamaError::NetworkError {
            message: format!("Request error: {}", error),
        }
    }

    async fn handle_error_response(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> OllamaError {
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.error)
            .unwrap_or(text);

        match status {
            StatusCode::TOO_MANY_REQUESTS
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::BAD_GATEWAY
            | StatusCode::GATEWAY_TIMEOUT => OllamaError::ServerBusy,
            StatusCode::NOT_FOUND if message.contains("model") => OllamaError::ModelNotFound {
                model: self.config.model.clone(),
            },
            _ => OllamaError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}
