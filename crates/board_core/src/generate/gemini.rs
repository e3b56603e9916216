use crate::config::Config;
use crate::error::AppError;
use crate::generate::{SubstepGenerator, build_prompt, fallback_steps, parse_steps};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` client. Issues a single request per call with no
/// retry and no timeout.
pub struct GeminiGenerator {
    client: Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl GeminiGenerator {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_key.clone())
            .with_model(config.model())
            .with_endpoint(config.endpoint())
    }

    pub fn with_model<M: Into<String>>(mut self, model: M) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint<E: Into<String>>(mut self, endpoint: E) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl SubstepGenerator for GeminiGenerator {
    async fn generate_substeps(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Vec<String>, AppError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("no API key configured; returning fallback steps");
            return Ok(fallback_steps());
        };

        let prompt = build_prompt(title, description);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: serde_json::json!({
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                }),
            },
        };

        tracing::debug!(model = %self.model, "requesting breakdown");
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_connect() {
                    AppError::generation(format!("connection failed: {err}"))
                } else {
                    AppError::generation(format!("request failed: {err}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AppError::generation(format!("failed to read response: {err}")))?;

        if !status.is_success() {
            return Err(AppError::generation(format!(
                "service returned {}: {}",
                status.as_u16(),
                body.chars().take(500).collect::<String>()
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|err| AppError::generation(format!("failed to parse response: {err}")))?;

        Ok(parse_steps(&parsed.text()))
    }
}
