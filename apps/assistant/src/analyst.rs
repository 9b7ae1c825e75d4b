// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-model analysis state

use crate::client::TextGenerator;
use crate::prompt::Prompt;
use ifcview_core::ModelMetadata;
use std::sync::{Mutex, MutexGuard};

pub const FALLBACK_ANALYSIS: &str = "Could not perform AI analysis at this time.";

#[derive(Debug, Default)]
struct State {
    metadata: Option<ModelMetadata>,
    analysis: Option<String>,
    is_analyzing: bool,
}

/// Holds the metadata of the displayed model and the latest analysis of it.
///
/// State is readable from other tasks while an analysis is in flight.
pub struct ModelAnalyst<G> {
    generator: G,
    state: Mutex<State>,
}

impl<G: TextGenerator> ModelAnalyst<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            state: Mutex::new(State::default()),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Track a newly loaded model. The previous analysis is kept until the
    /// next `analyze`.
    pub fn set_metadata(&self, metadata: Option<ModelMetadata>) {
        self.state().metadata = metadata;
    }

    pub fn metadata(&self) -> Option<ModelMetadata> {
        self.state().metadata.clone()
    }

    pub fn analysis(&self) -> Option<String> {
        self.state().analysis.clone()
    }

    pub fn is_analyzing(&self) -> bool {
        self.state().is_analyzing
    }

    /// Ask the generator about the current model.
    ///
    /// Does nothing without metadata or while another analysis runs.
    /// Generator failures are logged and replaced by [`FALLBACK_ANALYSIS`].
    pub async fn analyze(&self) -> Option<String> {
        let prompt = {
            let mut state = self.state();
            if state.is_analyzing {
                tracing::debug!("Analysis already in progress");
                return None;
            }
            let metadata = state.metadata.as_ref()?;
            let prompt = Prompt::for_metadata(metadata);
            state.is_analyzing = true;
            prompt
        };

        let _busy = Busy(&self.state);
        let analysis = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(error = %err, "Model analysis failed");
                FALLBACK_ANALYSIS.to_string()
            }
        };

        self.state().analysis = Some(analysis.clone());
        Some(analysis)
    }
}

/// Clears `is_analyzing` when an analysis finishes or is dropped mid-flight
struct Busy<'a>(&'a Mutex<State>);

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        let mut state = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.is_analyzing = false;
    }
}
