// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-View Assistant
//!
//! Short professional commentary on a loaded model, generated from its
//! [`ModelMetadata`](ifcview_core::ModelMetadata) by a remote text model.
//!
//! ```rust,ignore
//! use ifcview_assistant::{AssistantConfig, GeminiClient, ModelAnalyst};
//!
//! let analyst = ModelAnalyst::new(GeminiClient::new(&AssistantConfig::from_env())?);
//! analyst.set_metadata(Some(metadata));
//! let insight = analyst.analyze().await;
//! ```

pub mod analyst;
pub mod client;
pub mod config;
pub mod error;
pub mod prompt;

pub use analyst::{ModelAnalyst, FALLBACK_ANALYSIS};
pub use client::{GeminiClient, TextGenerator};
pub use config::AssistantConfig;
pub use error::{AssistantError, Result};
pub use prompt::{Prompt, SYSTEM_INSTRUCTION};
