//! Wire types for the text-generation endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body: one prompt, one input, fixed temperature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateRequest {
    /// The rubric.
    pub prompt: String,
    /// Texts to classify. Always exactly one post body.
    pub inputs: Vec<String>,
    /// Sampling temperature.
    pub temperature: f64,
}

impl GenerateRequest {
    /// A request classifying `input` against `prompt`.
    pub fn new(prompt: impl Into<String>, input: impl Into<String>, temperature: f64) -> Self {
        Self {
            prompt: prompt.into(),
            inputs: vec![input.into()],
            temperature,
        }
    }
}

/// Response body. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,

    /// Present (and non-null) when the endpoint reports a failure.
    #[serde(default)]
    pub error: Option<Value>,
}

/// One generated output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub output: Option<String>,
}

impl GenerateResponse {
    /// Human-readable form of the `error` field, if any.
    ///
    /// Accepts `{"error": "..."}` and `{"error": {"message": "..."}}`;
    /// any other shape is rendered as JSON.
    pub fn error_message(&self) -> Option<String> {
        let error = self.error.as_ref()?;
        Some(
            error
                .get("message")
                .and_then(Value::as_str)
                .or_else(|| error.as_str())
                .map(String::from)
                .unwrap_or_else(|| error.to_string()),
        )
    }

    /// `predictions[0].output`.
    pub fn first_output(&self) -> Option<&str> {
        self.predictions.first()?.output.as_deref()
    }
}
