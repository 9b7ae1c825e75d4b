// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events emitted by the viewer
//!
//! Serialized shapes are what a UI shell consumes:
//! `{"type":"loadingStarted"}`,
//! `{"type":"loaded","name":..,"elementCount":..,"nodeCount":..}` and
//! `{"type":"loaded","error":".."}`.

use ifcview_core::ModelMetadata;
use serde::Serialize;

/// Result of one load as reported to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LoadOutcome {
    Metadata(ModelMetadata),
    Error { error: String },
}

impl LoadOutcome {
    pub fn metadata(&self) -> Option<&ModelMetadata> {
        match self {
            LoadOutcome::Metadata(metadata) => Some(metadata),
            LoadOutcome::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadOutcome::Metadata(_) => None,
            LoadOutcome::Error { error } => Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ViewerEvent {
    LoadingStarted,
    Loaded(LoadOutcome),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loaded_metadata_shape() {
        let event = ViewerEvent::Loaded(LoadOutcome::Metadata(ModelMetadata::new("house.ifc", 3, 7)));
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "loaded", "name": "house.ifc", "elementCount": 3, "nodeCount": 7})
        );
    }

    #[test]
    fn test_loaded_error_shape() {
        let event = ViewerEvent::Loaded(LoadOutcome::Error {
            error: "Failed to parse IFC file.".into(),
        });
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "loaded", "error": "Failed to parse IFC file."})
        );
    }

    #[test]
    fn test_loading_started_shape() {
        assert_eq!(
            serde_json::to_value(ViewerEvent::LoadingStarted).unwrap(),
            json!({"type": "loadingStarted"})
        );
    }
}
