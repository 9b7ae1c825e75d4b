// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the viewer.

use thiserror::Error;

/// Result type for viewer lifecycle operations
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Lifecycle errors surfaced to the host.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewerError {
    /// The render surface could not be created. Fatal to the viewer instance.
    #[error("Failed to create render surface: {0}")]
    ResourceInit(String),

    /// A previous initialization failed; the instance is not retried.
    #[error("Viewer is unusable after a failed initialization: {0}")]
    Faulted(String),

    #[error("Viewer has been disposed")]
    Disposed,
}

/// Failure reported by the external parser collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Unsupported content: {0}")]
    Unsupported(String),
}

/// Why a model load did not produce a scene.
///
/// Everything that goes wrong inside the load pipeline is converted to one
/// of these at the loader boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Parse failure: {0}")]
    Parse(#[from] ParseError),

    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

impl LoadError {
    /// Short machine-oriented category
    pub fn reason(&self) -> &'static str {
        match self {
            LoadError::Parse(_) => "parse failure",
            LoadError::Unexpected(_) => "unexpected failure",
        }
    }

    /// Message shown to the user in place of the raw error
    pub fn user_message(&self) -> &'static str {
        match self {
            LoadError::Parse(_) => "Failed to parse IFC file.",
            LoadError::Unexpected(_) => "An error occurred.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_taxonomy() {
        let parse = LoadError::from(ParseError::Syntax("unexpected token".into()));
        assert_eq!(parse.reason(), "parse failure");
        assert_eq!(parse.user_message(), "Failed to parse IFC file.");

        let unexpected = LoadError::Unexpected("callback dropped".into());
        assert_eq!(unexpected.reason(), "unexpected failure");
        assert_eq!(unexpected.user_message(), "An error occurred.");
    }
}
