// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural summary of a loaded model

use crate::node::SceneNode;

/// Counts reported once per successful load. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ModelMetadata {
    /// Source file name
    pub name: String,
    /// Direct children of the model root
    pub element_count: usize,
    /// Whole subtree including the model root
    pub node_count: usize,
}

impl ModelMetadata {
    pub fn new(name: impl Into<String>, element_count: usize, node_count: usize) -> Self {
        Self {
            name: name.into(),
            element_count,
            node_count,
        }
    }

    /// Summarize the subtree rooted at `root`
    pub fn from_root(name: impl Into<String>, root: &SceneNode) -> Self {
        Self::new(name, root.children().len(), count_nodes(root))
    }
}

/// Number of nodes in the subtree rooted at `root`, including `root`.
///
/// Owned trees cannot contain cycles, so no visited set is kept.
pub fn count_nodes(root: &SceneNode) -> usize {
    root.descendants().count()
}
