// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text-generation collaborators.
//!
//! [`TextGenerator`] is the seam the analyst talks to; [`GeminiClient`] is the
//! REST implementation used by the binary.

use crate::config::AssistantConfig;
use crate::error::{AssistantError, Result};
use crate::prompt::Prompt;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Anything that turns a prompt into text.
pub trait TextGenerator {
    fn generate(&self, prompt: &Prompt) -> impl Future<Output = Result<String>> + Send;
}

/// `generateContent` REST client.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

impl GeminiClient {
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or(AssistantError::MissingApiKey)?;
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: [Part {
                    text: &prompt.system_instruction,
                }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part {
                    text: &prompt.contents,
                }],
            }],
        };

        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(AssistantError::Status { status, body });
        }

        let raw = resp.bytes().await?;
        let parsed: GenerateResponse = serde_json::from_slice(&raw)?;
        let text = parsed.text().ok_or(AssistantError::EmptyResponse)?;

        tracing::debug!(model = %self.model, chars = text.len(), "Generated analysis");
        Ok(text)
    }
}
