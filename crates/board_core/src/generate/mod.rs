//! Task-generation adapter: asks a text-generation service for a handful of
//! sub-steps for a task.

use crate::error::AppError;
use async_trait::async_trait;

mod gemini;

pub use gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiGenerator};

/// Returned instead of calling out when no API key is configured.
pub const FALLBACK_STEPS: [&str; 2] = ["Check API Key Configuration", "Manually add steps"];

#[async_trait]
pub trait SubstepGenerator: Send + Sync {
    async fn generate_substeps(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Vec<String>, AppError>;
}

pub fn fallback_steps() -> Vec<String> {
    FALLBACK_STEPS.iter().map(|step| step.to_string()).collect()
}

pub fn build_prompt(title: &str, description: Option<&str>) -> String {
    let mut prompt = format!("Task: {title}\n");
    if let Some(context) = description.map(str::trim).filter(|value| !value.is_empty()) {
        prompt.push_str(&format!("Context: {context}\n"));
    }
    prompt.push_str(
        "\nYou are an expert Project Manager. Break down this task into 3-5 concrete, actionable steps.\n\
         Keep them concise (under 10 words each).\n\
         Return ONLY a JSON array of strings.\n",
    );
    prompt
}

/// Reads the model's answer. Anything other than a JSON array yields no
/// steps; array elements are kept as-is, non-strings as their JSON text.
pub fn parse_steps(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(step) => step,
                other => other.to_string(),
            })
            .collect(),
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "generation result is not an array");
            Vec::new()
        }
        Err(err) => {
            tracing::warn!(error = %err, "generation result is not JSON");
            Vec::new()
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Always answers with the same result.
pub struct FixedGenerator {
    result: Result<Vec<String>, AppError>,
}

impl FixedGenerator {
    pub fn steps<I, T>(steps: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            result: Ok(steps.into_iter().map(Into::into).collect()),
        }
    }

    pub fn failing(err: AppError) -> Self {
        Self { result: Err(err) }
    }
}

#[async_trait]
impl SubstepGenerator for FixedGenerator {
    async fn generate_substeps(
        &self,
        _title: &str,
        _description: Option<&str>,
    ) -> Result<Vec<String>, AppError> {
        self.result.clone()
    }
}
