// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Prompt construction from model metadata.

use ifcview_core::ModelMetadata;

pub const SYSTEM_INSTRUCTION: &str = "You are a professional BIM manager. Provide concise technical analysis of architectural models based on metadata.";

/// One text-generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_instruction: String,
    pub contents: String,
}

impl Prompt {
    pub fn for_metadata(metadata: &ModelMetadata) -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            contents: format!(
                "Analyze this BIM model metadata and give a very brief professional insight (max 3 sentences): File: {}, Elements: {}, Complexity: {} nodes.",
                metadata.name, metadata.element_count, metadata.node_count
            ),
        }
    }
}
