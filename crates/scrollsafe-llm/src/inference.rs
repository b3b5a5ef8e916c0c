//! HTTP implementation of [`Judge`].
//!
//! [`InferenceJudge`] sends one `POST` per post to a text-generation
//! endpoint with the rubric as the prompt and the post body as the single
//! input, then looks for the cringe marker in the first prediction.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use scrollsafe_types::{ApiCredential, JudgeConfig, PostFields};

use crate::error::{JudgeError, Result};
use crate::judge::Judge;
use crate::prompt::{RUBRIC, verdict_from_output};
use crate::types::{GenerateRequest, GenerateResponse};

/// A [`Judge`] backed by a remote text-generation API.
///
/// # Construction
///
/// ```rust,ignore
/// use scrollsafe_llm::InferenceJudge;
/// use scrollsafe_types::JudgeConfig;
///
/// let judge = InferenceJudge::new(JudgeConfig::default())?;
/// ```
pub struct InferenceJudge {
    config: JudgeConfig,
    http: reqwest::Client,
}

impl InferenceJudge {
    /// Build a judge. Applies `config.timeout_secs` to the HTTP client.
    pub fn new(config: JudgeConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            config,
            http: builder.build()?,
        })
    }

    /// Returns the judge configuration.
    pub fn config(&self) -> &JudgeConfig {
        &self.config
    }
}

#[async_trait]
impl Judge for InferenceJudge {
    fn name(&self) -> &str {
        "inference"
    }

    async fn judge(&self, post: &PostFields, credential: &ApiCredential) -> Result<bool> {
        let endpoint = self.config.endpoint.trim();
        if endpoint.is_empty() {
            return Err(JudgeError::NotConfigured("endpoint is empty".into()));
        }

        let request = GenerateRequest::new(RUBRIC, &post.body_text, self.config.temperature);
        debug!(
            endpoint = %endpoint,
            chars = post.body_text.len(),
            "sending classification request"
        );

        let mut req = self
            .http
            .post(endpoint)
            .header("Authorization", credential.bearer())
            .header("Content-Type", "application/json");
        for (k, v) in &self.config.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        let response = req.json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => JudgeError::AuthFailed(body),
                429 => {
                    warn!(body = %body, "classifier rate limited");
                    JudgeError::RateLimited(body)
                }
                _ => JudgeError::RequestFailed(format!("HTTP {status}: {body}")),
            });
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)?;

        if let Some(message) = parsed.error_message() {
            return Err(JudgeError::Api(message));
        }
        let output = parsed.first_output().ok_or_else(|| {
            JudgeError::InvalidResponse("missing predictions[0].output".into())
        })?;

        let verdict = verdict_from_output(output);
        trace!(output = %output, verdict, "classification response received");
        Ok(verdict)
    }
}

impl std::fmt::Debug for InferenceJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceJudge")
            .field("endpoint", &self.config.endpoint)
            .field("temperature", &self.config.temperature)
            .field("timeout_secs", &self.config.timeout_secs)
            .finish()
    }
}
