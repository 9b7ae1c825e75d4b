// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the assistant.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssistantError>;

/// Text-generation failures.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("API_KEY is not set")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Service returned no text")]
    EmptyResponse,

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
