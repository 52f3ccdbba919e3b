/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Topology-aware node selection.
//!
//! [`NodeEvaluator`] picks `node_count` nodes out of an available set so that
//! the allocation spans as few leaf switches as possible.  Evaluations are
//! read-only over a shared [`Topology`] and keep all working state local.
//!
//! # Algorithm (tree topology)
//! ```text
//!   check request ──► top switch ──► restrict to its subtree
//!                                        │
//!          required nodes cover demand? ─┴─► yes ─────────────────┐
//!                                        │ no                     │
//!   candidate pool ──► absorb required leaves ──► greedy fill ──► count leaves
//! ```
//! A step may end the search early; leaf switches are still counted once, at
//! the end.

pub mod compare;
pub mod error;

pub use error::EvalError;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::nodeset::NodeSet;
use crate::topology::{distance, hostlist, Topology};

// ── Request / result types ────────────────────────────────────────────────────

/// Which interconnect model the evaluator assumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TopologyKind {
    /// Hierarchical switch tree.
    #[default]
    Tree,
    /// Dragonfly interconnect.  Selection is not implemented: every request
    /// succeeds with an empty allocation.
    Dragonfly,
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyKind::Tree => write!(f, "tree"),
            TopologyKind::Dragonfly => write!(f, "dragonfly"),
        }
    }
}

/// One allocation request.
#[derive(Debug, Clone, Default)]
pub struct EvalRequest {
    /// Nodes that may be allocated.
    pub available: NodeSet,
    /// Nodes that must be part of the allocation.
    pub required: Option<NodeSet>,
    /// Target allocation size.
    pub node_count: u32,
}

/// Successful evaluation result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub nodes: NodeSet,
    pub leaf_switch_count: u16,
}

/// Nodes sharing a scheduling weight.  Only one group exists today.
#[derive(Debug)]
struct WeightGroup {
    weight: u32,
    nodes: NodeSet,
}

fn weight_groups(available: &NodeSet) -> Vec<WeightGroup> {
    vec![WeightGroup {
        weight: 0,
        nodes: available.clone(),
    }]
}

// ── NodeEvaluator ─────────────────────────────────────────────────────────────

/// Runs allocation requests against a loaded topology.
///
/// Cheap to clone; clones share the same [`Topology`].
#[derive(Debug, Clone)]
pub struct NodeEvaluator {
    topology: Arc<Topology>,
    kind: TopologyKind,
}

impl NodeEvaluator {
    pub fn new(topology: Arc<Topology>) -> Self {
        Self {
            topology,
            kind: TopologyKind::Tree,
        }
    }

    pub fn with_kind(mut self, kind: TopologyKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> TopologyKind {
        self.kind
    }

    /// Evaluate one request.
    ///
    /// # Errors
    /// Any [`EvalError`]; no partial allocation is ever returned.
    pub fn eval_nodes(&self, request: &EvalRequest) -> Result<Allocation, EvalError> {
        match self.kind {
            TopologyKind::Tree => self.eval_tree(request),
            TopologyKind::Dragonfly => {
                warn!("dragonfly topology selection is not implemented, returning empty allocation");
                Ok(Allocation::default())
            }
        }
    }

    /// Name-list front end to [`eval_nodes`](Self::eval_nodes).
    ///
    /// Every entry may be a plain node name or a hostlist expression.
    /// Available names the topology does not know are dropped; an empty
    /// `required` list means no node is required.
    pub fn evaluate<S: AsRef<str>>(
        &self,
        available: &[S],
        required: &[S],
        node_count: u32,
    ) -> Result<Allocation, EvalError> {
        let mut available_set = NodeSet::new();
        for name in expand_all(available)? {
            if self.topology.contains_node(&name) {
                available_set.insert(name);
            } else {
                debug!(node = %name, "available node is not in the topology, ignoring");
            }
        }

        let required_set: NodeSet = expand_all(required)?.into_iter().collect();

        self.eval_nodes(&EvalRequest {
            available: available_set,
            required: (!required_set.is_empty()).then_some(required_set),
            node_count,
        })
    }

    fn eval_tree(&self, request: &EvalRequest) -> Result<Allocation, EvalError> {
        check_request(request)?;

        let groups = weight_groups(&request.available);
        let mut eval = TreeEval::new(&self.topology, request);
        eval.select(&groups)?;
        let allocation = eval.finish();

        info!(
            requested = request.node_count,
            allocated = allocation.nodes.len(),
            leaf_switches = allocation.leaf_switch_count,
            "nodes evaluated"
        );
        Ok(allocation)
    }
}

fn expand_all<S: AsRef<str>>(exprs: &[S]) -> Result<Vec<String>, EvalError> {
    let mut names = Vec::new();
    for expr in exprs {
        let expr = expr.as_ref();
        let expanded =
            hostlist::expand_names(expr).map_err(|source| EvalError::InvalidNodeExpr {
                expr: expr.to_string(),
                source,
            })?;
        names.extend(expanded);
    }
    Ok(names)
}

/// Request preconditions, checked before touching the switch table.
fn check_request(request: &EvalRequest) -> Result<(), EvalError> {
    if let Some(required) = &request.required {
        if !required.is_subset_of(&request.available) {
            return Err(EvalError::RequiredUnavailable);
        }
        if required.is_empty() {
            return Err(EvalError::RequiredEmpty);
        }
        if required.len() > request.available.len() {
            return Err(EvalError::RequiredExceedsAvailable {
                required: required.len(),
                available: request.available.len(),
            });
        }
    }
    if request.available.is_empty() {
        return Err(EvalError::EmptyNodeMap);
    }
    Ok(())
}

// ── Tree evaluation ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Satisfied,
    Pending,
}

/// Working state of one tree evaluation.  All vectors are indexed like the
/// topology's switch table.
struct TreeEval<'a> {
    topology: &'a Topology,
    required: Option<&'a NodeSet>,
    /// Usable nodes under each switch.
    switch_nodes: Vec<NodeSet>,
    /// Usable node count per switch; `0` once a leaf is used up.
    counts: Vec<usize>,
    /// Switch holds at least one required node.
    switch_required: Vec<bool>,
    allocation: NodeSet,
    remaining: i64,
}

impl<'a> TreeEval<'a> {
    fn new(topology: &'a Topology, request: &'a EvalRequest) -> Self {
        let required = request.required.as_ref();

        let credited = required.map_or(0, |r| {
            r.iter().filter(|n| request.available.contains(n)).count()
        });
        let remaining = i64::from(request.node_count) - credited as i64;

        let mut switch_nodes = Vec::with_capacity(topology.switch_count());
        let mut counts = Vec::with_capacity(topology.switch_count());
        let mut switch_required = Vec::with_capacity(topology.switch_count());
        for sw in topology.switches() {
            let mut nodes = sw.node_bitmap.clone();
            nodes.intersect(&request.available);
            counts.push(nodes.len());
            switch_required.push(required.is_some_and(|r| r.overlaps(&nodes)));
            switch_nodes.push(nodes);
        }

        Self {
            topology,
            required,
            switch_nodes,
            counts,
            switch_required,
            allocation: NodeSet::new(),
            remaining,
        }
    }

    /// Fill `self.allocation`; `Ok` means the request is satisfied.
    fn select(&mut self, groups: &[WeightGroup]) -> Result<(), EvalError> {
        let top = self.top_switch()?;

        if let Some(required) = self.required {
            if !required.is_subset_of(&self.switch_nodes[top]) {
                return Err(EvalError::RequiredNotShared);
            }
        }

        self.restrict_to_subtree(top);

        if let Some(required) = self.required {
            self.allocation = required.clone();
        }
        // Zero demand ends here, before the greedy fill could add a node.
        if self.remaining <= 0 {
            debug!("request satisfied without searching");
            return Ok(());
        }

        let pool = self.candidate_pool(groups, top)?;
        self.restrict_to_pool(&pool);

        if self.absorb_required_leaves() == Progress::Satisfied {
            return Ok(());
        }

        let dist = self.seed_distances();
        self.greedy_fill(dist)
    }

    /// The switch bounding the search: the highest switch holding a required
    /// node, or else the highest switch holding enough available nodes.
    fn top_switch(&self) -> Result<usize, EvalError> {
        let switches = self.topology.switches();
        let mut top: Option<usize> = None;

        for (i, sw) in switches.iter().enumerate() {
            if self.switch_required[i] {
                if top.map_or(true, |t| sw.level > switches[t].level) {
                    top = Some(i);
                }
            } else if self.required.is_none()
                && self.counts[i] as i64 >= self.remaining
                && top.map_or(true, |t| sw.level >= switches[t].level)
            {
                top = Some(i);
            }
        }

        let top = top.ok_or(EvalError::NoTopSwitch)?;
        debug!(switch = %switches[top].name, level = switches[top].level, "top switch selected");
        Ok(top)
    }

    /// Drop nodes not reachable from the top switch.
    fn restrict_to_subtree(&mut self, top: usize) {
        let top_nodes = self.switch_nodes[top].clone();
        for (i, nodes) in self.switch_nodes.iter_mut().enumerate() {
            if i != top {
                nodes.intersect(&top_nodes);
            }
        }
    }

    /// Collect candidates under the top switch, group by group.
    fn candidate_pool(&self, groups: &[WeightGroup], top: usize) -> Result<NodeSet, EvalError> {
        let top_nodes = &self.switch_nodes[top];
        let mut pool = NodeSet::new();
        let mut sufficient = false;

        for group in groups {
            for name in &group.nodes {
                if top_nodes.contains(name) {
                    pool.insert(name.as_str());
                }
            }
            debug!(weight = group.weight, candidates = pool.len(), "weight group scanned");
            sufficient = sufficient || pool.len() as i64 >= self.remaining;
        }

        if !sufficient {
            return Err(EvalError::Insufficient {
                remaining: self.remaining,
            });
        }

        pool.union(&self.allocation);
        Ok(pool)
    }

    fn restrict_to_pool(&mut self, pool: &NodeSet) {
        for (nodes, count) in self.switch_nodes.iter_mut().zip(self.counts.iter_mut()) {
            nodes.intersect(pool);
            *count = nodes.len();
        }
    }

    /// Take the rest of every leaf switch that already hosts a required node.
    fn absorb_required_leaves(&mut self) -> Progress {
        let topology = self.topology;

        for (i, _) in topology.leaf_switches() {
            if !self.switch_required[i] {
                continue;
            }
            for name in &self.switch_nodes[i] {
                if self.allocation.insert(name.as_str()) {
                    self.remaining -= 1;
                    if self.remaining <= 0 {
                        return Progress::Satisfied;
                    }
                }
            }
        }
        Progress::Pending
    }

    fn seed_distances(&self) -> Vec<u32> {
        let mut dist = vec![0; self.topology.switch_count()];
        for (i, sw) in self.topology.leaf_switches() {
            if self.switch_required[i] {
                distance::accumulate(&mut dist, &sw.distances);
            }
        }
        dist
    }

    /// Repeatedly take the best leaf switch until the demand is met.
    fn greedy_fill(&mut self, mut dist: Vec<u32>) -> Result<(), EvalError> {
        let topology = self.topology;
        let switches = topology.switches();
        let mut prev_remaining = self.remaining + 1;

        loop {
            if prev_remaining == self.remaining {
                return Err(EvalError::Stalled {
                    remaining: self.remaining,
                });
            }
            prev_remaining = self.remaining;

            let best = topology.leaf_switches().fold(None, |best, (i, _)| {
                compare::choose_best_switch(
                    topology,
                    &dist,
                    &self.counts,
                    self.remaining,
                    i,
                    best,
                )
            });
            let Some(best) = best else {
                return Err(EvalError::Stalled {
                    remaining: self.remaining,
                });
            };

            debug!(
                switch = %switches[best].name,
                available = self.counts[best],
                remaining = self.remaining,
                "leaf switch chosen"
            );
            distance::accumulate(&mut dist, &switches[best].distances);

            for name in &self.switch_nodes[best] {
                if self.allocation.insert(name.as_str()) {
                    self.remaining -= 1;
                    if self.remaining <= 0 {
                        return Ok(());
                    }
                }
            }
            self.counts[best] = 0;
        }
    }

    fn finish(self) -> Allocation {
        let leaves = self
            .topology
            .leaf_switches()
            .filter(|(i, _)| self.switch_nodes[*i].overlaps(&self.allocation))
            .count();
        debug!("Allocated {} nodes on {} leaf switches", self.allocation.len(), leaves);

        Allocation {
            nodes: self.allocation,
            leaf_switch_count: u16::try_from(leaves).unwrap_or(u16::MAX),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
