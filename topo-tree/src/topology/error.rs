/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Fatal configuration errors raised while loading a topology.
//!
//! Anything listed here aborts the load: no [`Topology`] is produced and no
//! evaluation can run against the file.  Recoverable problems (duplicate
//! switch names, lines declaring both `Nodes=` and `Switches=`, a bad
//! `LinkSpeed`, a switch with no nodes) are only logged with `warn!` and the
//! offending line is skipped or degraded.
//!
//! [`Topology`]: super::Topology

use std::path::PathBuf;

use thiserror::Error;

use super::hostlist::HostlistError;

/// Error type returned by [`Topology::load`](super::Topology::load) and
/// [`Topology::from_descriptors`](super::Topology::from_descriptors).
#[derive(Debug, Error)]
pub enum TopologyError {
    /// The topology file could not be opened or read.
    #[error("cannot read topology file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file contained no usable switch definition.
    #[error("no switches configured")]
    NoSwitches,

    /// A leaf switch's `Nodes=` expression could not be expanded.
    #[error("invalid node name ({expr}) in switch config ({switch})")]
    InvalidNodeList {
        switch: String,
        expr: String,
        #[source]
        source: HostlistError,
    },

    /// An internal switch's `Switches=` expression could not be expanded.
    #[error("invalid switch name ({expr}) in switch config ({switch})")]
    InvalidSwitchList {
        switch: String,
        expr: String,
        #[source]
        source: HostlistError,
    },

    /// A child switch name that is not defined, or that names the switch
    /// itself.
    #[error("switch configuration {switch} has invalid child ({child})")]
    InvalidChild { switch: String, child: String },

    /// Level resolution did not converge within the pass limit; the graph
    /// contains a cycle.
    #[error("switch configuration is not a tree: {} switch(es) unresolved after {passes} passes ({})", .unresolved.len(), .unresolved.join(","))]
    NotATree {
        passes: usize,
        unresolved: Vec<String>,
    },

    /// A switch is listed as a child by more than one parent.
    #[error("switch configuration is not a tree: {child} has parents {first} and {second}")]
    MultipleParents {
        child: String,
        first: String,
        second: String,
    },
}
