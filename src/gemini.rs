use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

// Wire types for the upstream generateContent REST contract

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize, Debug, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Deserialize, Debug, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    // The single place that knows where the text lives in the response
    // shape; everything above this only ever sees a plain string.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let joined: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if joined.is_empty() { None } else { Some(joined) }
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(base_url: String, model: String, api_key: String, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            model,
            api_key,
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    // One attempt, bounded by the configured timeout; no retry, no
    // backoff. Transient upstream failures propagate to the caller.
    pub async fn generate(
        &self,
        system_instruction: &str,
        user_content: &str,
    ) -> Result<String, PipelineError> {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(system_instruction.to_string()),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(user_content.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let result = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Err(PipelineError::GenerationTimeout(self.timeout.as_secs()));
            }
            Err(e) => return Err(PipelineError::UpstreamService(format!("Request failed: {e}"))),
        };

        if !response.status().is_success() {
            return Err(PipelineError::UpstreamService(format!(
                "Upstream returned status {}",
                response.status()
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::UpstreamService(format!("Parse Error: {e}")))?;

        parsed.text().ok_or(PipelineError::EmptyGenerationResult)
    }
}
