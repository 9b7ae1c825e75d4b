// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-View Assistant - comments on a model's metadata.
//!
//! Reads `{"name": .., "elementCount": .., "nodeCount": ..}` from the file
//! given as first argument, or from stdin, and prints the analysis.
//!
//! # Environment
//!
//! - `API_KEY` - text-generation API key (required)
//! - `GEMINI_MODEL`, `GEMINI_BASE_URL`, `ASSISTANT_TIMEOUT_SECS`

use anyhow::Context;
use ifcview_assistant::{AssistantConfig, GeminiClient, ModelAnalyst};
use ifcview_core::ModelMetadata;
use std::io::Read;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,ifcview_assistant=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw = match std::env::args().nth(1) {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read metadata from stdin")?;
            buf
        }
    };
    let metadata: ModelMetadata =
        serde_json::from_str(&raw).context("Metadata is not valid JSON")?;

    let config = AssistantConfig::from_env();
    tracing::info!(
        model = %config.model,
        name = %metadata.name,
        element_count = metadata.element_count,
        node_count = metadata.node_count,
        "Analyzing model"
    );

    let client = GeminiClient::new(&config).context("Failed to create text-generation client")?;
    let analyst = ModelAnalyst::new(client);
    analyst.set_metadata(Some(metadata));

    if let Some(analysis) = analyst.analyze().await {
        println!("{analysis}");
    }
    Ok(())
}
