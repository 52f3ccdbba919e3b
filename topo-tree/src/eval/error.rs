/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use thiserror::Error;

use crate::topology::hostlist::HostlistError;

/// Reasons a single node evaluation can fail.
///
/// An error never carries a partial allocation, and it leaves the topology
/// and any other evaluation untouched.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A caller-supplied node expression could not be expanded.
    #[error("invalid node expression '{expr}'")]
    InvalidNodeExpr {
        expr: String,
        #[source]
        source: HostlistError,
    },

    #[error("requires nodes which are not currently available")]
    RequiredUnavailable,

    #[error("required node list has no nodes")]
    RequiredEmpty,

    #[error("requires more nodes than currently available ({required}>{available})")]
    RequiredExceedsAvailable { required: usize, available: usize },

    #[error("node_map is empty")]
    EmptyNodeMap,

    /// No single subtree holds enough available nodes (disjoint topology).
    #[error("unable to identify top level switch")]
    NoTopSwitch,

    #[error("required nodes are not on shared network")]
    RequiredNotShared,

    /// The candidate pool under the top switch is smaller than the demand.
    #[error("insufficient resources currently available ({remaining} more node(s) needed)")]
    Insufficient { remaining: i64 },

    /// The greedy fill ran out of usable leaf switches with demand left.
    #[error("insufficient resources currently available (search stalled with {remaining} node(s) outstanding)")]
    Stalled { remaining: i64 },
}
