use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Model;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The API answered with a non-success status.
    #[error("Gemini API error ({status}): {message}")]
    Status { status: u16, message: String },
    /// No response was received at all (connect failure, timeout, reset).
    #[error("Gemini API unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),
    #[error("Unexpected response format from Gemini API")]
    UnexpectedFormat,
    #[error("{0}")]
    Local(String),
}

// generateContent request/response format
#[derive(Debug, Clone, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Clone, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Clone, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Sends one generateContent request and returns the first candidate's text.
    /// There is no retry: each call is exactly one upstream attempt.
    pub async fn complete(
        &self,
        model: Model,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, CompletionError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    CompletionError::Local(format!("Failed to build Gemini request: {e}"))
                } else {
                    CompletionError::Unreachable(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Unknown API error".to_string());
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(CompletionError::Unreachable)?;
        extract_text(&body)
    }
}

fn extract_text(body: &str) -> Result<String, CompletionError> {
    let api_response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|_| CompletionError::UnexpectedFormat)?;

    api_response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or(CompletionError::UnexpectedFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_part_of_first_candidate() {
        let body = r#"{"candidates":[
            {"content":{"parts":[{"text":"| a | b |"},{"text":"ignored"}]}},
            {"content":{"parts":[{"text":"second"}]}}
        ]}"#;
        assert_eq!(extract_text(body).unwrap(), "| a | b |");
    }

    #[test]
    fn missing_shape_is_unexpected_format() {
        for body in [
            "{}",
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
            "not json",
        ] {
            assert!(
                matches!(extract_text(body), Err(CompletionError::UnexpectedFormat)),
                "{body}"
            );
        }
    }
}
