// src/gemini/client.rs
//! Client for the generative model's `generateContent` REST endpoint.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{error, info};

use super::prompt::{PARSE_REQUEST_TEXT, RESUME_PARSER_INSTRUCTION};
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};
use crate::environment::EnvironmentConfig;

/// Read-only once-at-startup configuration, safe for concurrent reuse.
/// Injected as managed state so tests can point it at a stub server.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(config: &EnvironmentConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.gemini_model.clone(),
            temperature: config.temperature,
        })
    }

    /// Send the document to the model and return the raw text of the first
    /// candidate. Exactly one call per invocation, never retried.
    pub async fn extract_resume(&self, document: &[u8], mime_type: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::from_text(RESUME_PARSER_INSTRUCTION)],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::from_text(PARSE_REQUEST_TEXT),
                    Part::from_bytes(BASE64.encode(document), mime_type),
                ],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                response_mime_type: "application/json".to_string(),
            },
        };

        info!(
            "Calling model {} with {} byte {} document",
            self.model,
            document.len(),
            mime_type
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call the generative model")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Model API error {}: {}", status, error_text);
            anyhow::bail!("Model returned error status {}: {}", status, error_text);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse model response")?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .context("Model response contained no text candidate")?;

        Ok(text)
    }
}
