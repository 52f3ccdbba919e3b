/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Request configuration: which topology to load and what to allocate.
//!
//! Values come from an optional YAML request file and from command-line
//! flags; a flag always wins over the file.  The expected YAML structure is:
//! ```yaml
//! topology: /etc/slurm-llnl/topology.conf
//! available_nodes: ["tux[0-7]", "tux12"]
//! required_nodes: ["tux4"]
//! requested_node_count: 3
//! kind: tree            # or dragonfly
//! ```
//! Every key is optional in the file; [`RequestConfig::resolve`] enforces
//! what an evaluation actually needs.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::eval::TopologyKind;
use crate::topology::DEFAULT_TOPOLOGY_PATH;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Maps directly onto the YAML file layout.
#[derive(Debug, Deserialize)]
struct RequestFile {
    topology: Option<PathBuf>,
    #[serde(default)]
    available_nodes: Vec<String>,
    #[serde(default)]
    required_nodes: Vec<String>,
    requested_node_count: Option<u32>,
    kind: Option<TopologyKind>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Request values gathered from one source (file or command line).
///
/// Node lists hold names or hostlist expressions, unexpanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestConfig {
    pub topology: Option<PathBuf>,
    pub available_nodes: Vec<String>,
    pub required_nodes: Vec<String>,
    pub requested_node_count: Option<u32>,
    pub kind: Option<TopologyKind>,
}

/// A request with every mandatory value present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub topology: PathBuf,
    pub available_nodes: Vec<String>,
    pub required_nodes: Vec<String>,
    pub requested_node_count: u32,
    pub kind: TopologyKind,
}

impl RequestConfig {
    /// Parses a YAML request file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or if the YAML is
    /// structurally invalid (including an unknown `kind`).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading request configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open request file: {}", path.display()))?;

        let file: RequestFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        debug!(
            topology = ?file.topology,
            available = file.available_nodes.len(),
            required = file.required_nodes.len(),
            count = ?file.requested_node_count,
            kind = ?file.kind,
            "request file parsed"
        );

        Ok(Self {
            topology: file.topology,
            available_nodes: file.available_nodes,
            required_nodes: file.required_nodes,
            requested_node_count: file.requested_node_count,
            kind: file.kind,
        })
    }

    /// Overlay `overrides` on `self`: every value set in `overrides` wins,
    /// a non-empty node list replaces the whole list.
    pub fn merge(self, overrides: RequestConfig) -> Self {
        fn pick_list(base: Vec<String>, over: Vec<String>) -> Vec<String> {
            if over.is_empty() {
                base
            } else {
                over
            }
        }

        Self {
            topology: overrides.topology.or(self.topology),
            available_nodes: pick_list(self.available_nodes, overrides.available_nodes),
            required_nodes: pick_list(self.required_nodes, overrides.required_nodes),
            requested_node_count: overrides.requested_node_count.or(self.requested_node_count),
            kind: overrides.kind.or(self.kind),
        }
    }

    /// Topology file to load, falling back to [`DEFAULT_TOPOLOGY_PATH`].
    pub fn topology_path(&self) -> PathBuf {
        match &self.topology {
            Some(path) => path.clone(),
            None => {
                warn!(
                    "No topology file given, using default: {}",
                    DEFAULT_TOPOLOGY_PATH
                );
                PathBuf::from(DEFAULT_TOPOLOGY_PATH)
            }
        }
    }

    /// Check that everything an evaluation needs is present.
    ///
    /// # Errors
    /// Returns an error if the requested node count or the available node
    /// list is missing.
    pub fn resolve(&self) -> Result<ResolvedRequest> {
        let Some(requested_node_count) = self.requested_node_count else {
            bail!("requested node count is not set (use -c or requested_node_count)");
        };
        if self.available_nodes.is_empty() {
            bail!("available node list is empty (use -a or available_nodes)");
        }

        Ok(ResolvedRequest {
            topology: self.topology_path(),
            available_nodes: self.available_nodes.clone(),
            required_nodes: self.required_nodes.clone(),
            requested_node_count,
            kind: self.kind.unwrap_or_default(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
