/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Switch topology: a validated tree of switches built from a topology file.
//!
//! A [`Topology`] is built once per file and never mutated afterwards.  All
//! relationships between switches are integer indices into one dense table:
//!
//! ```text
//! switches[i].parent_index        immediate parent (a root is its own parent)
//! switches[i].child_indices       direct children
//! switches[i].descendant_indices  every switch below, any depth
//! switches[i].distances[j]        hop count from i to j
//! ```
//!
//! Reloading means building a new `Topology` and swapping the `Arc` that
//! evaluators hold; there is no incremental update.
//!
//! # Build pipeline
//! 1. [`loader::read_topology_file`] → `Vec<SwitchDescriptor>`
//! 2. records + node table (duplicate switch names dropped, first wins)
//! 3. child references checked, levels resolved bottom-up (bounded passes)
//! 4. child / parent / descendant indices
//! 5. [`distance::distance_matrix`]

pub mod distance;
pub mod error;
pub mod hostlist;
pub mod loader;

pub use distance::INFINITE;
pub use error::TopologyError;
pub use loader::SwitchDescriptor;

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::nodeset::NodeSet;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Default location of the topology file.
pub const DEFAULT_TOPOLOGY_PATH: &str = "/etc/slurm-llnl/topology.conf";

/// Whole-table passes allowed for level resolution before the configuration
/// is declared cyclic.
pub const MAX_RESOLVE_PASSES: usize = 20;

// ── Records ───────────────────────────────────────────────────────────────────

/// One configured switch.
#[derive(Debug, Clone)]
pub struct SwitchRecord {
    /// Unique switch name.
    pub name: String,

    /// Level in the hierarchy: `0` for leaf switches, `1 + max(child level)`
    /// for internal switches.
    pub level: u32,

    /// Link speed, arbitrary units.  Informational only.
    pub link_speed: u32,

    /// Every node reachable below this switch.
    pub node_bitmap: NodeSet,

    /// Raw `Nodes=` expression (leaf switches).
    pub nodes: Option<String>,

    /// Raw `Switches=` expression (internal switches).
    pub switches: Option<String>,

    pub child_indices: Vec<usize>,
    pub descendant_indices: Vec<usize>,
    pub parent_index: usize,

    /// Hop distance to every switch in the table, [`INFINITE`] if
    /// unreachable.
    pub distances: Vec<u32>,
}

impl SwitchRecord {
    pub fn is_leaf(&self) -> bool {
        self.level == 0
    }
}

/// A compute node known to the topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    pub name: String,
    /// Locality rank from [`Topology::ranked_nodes`]; `0` = unranked.
    pub rank: u32,
}

/// Switch record under construction.  `level == None` means unresolved.
struct PendingSwitch {
    name: String,
    link_speed: u32,
    nodes: Option<String>,
    switches: Option<String>,
    level: Option<u32>,
    node_bitmap: NodeSet,
    child_names: NodeSet,
}

// ── Topology ──────────────────────────────────────────────────────────────────

/// Immutable switch and node tables for one topology file.
#[derive(Debug, Clone)]
pub struct Topology {
    switches: Vec<SwitchRecord>,
    nodes: Vec<NodeRecord>,
    switch_lookup: HashMap<String, usize>,
    node_lookup: HashMap<String, usize>,
    levels: u32,
}

impl Topology {
    /// Read `path` and build a validated topology from it.
    ///
    /// # Errors
    /// Any [`TopologyError`]: unreadable file, no usable switch, malformed
    /// name expression, dangling child, cycle, or a switch with two parents.
    pub fn load(path: &Path) -> Result<Self, TopologyError> {
        info!("Loading topology from: {}", path.display());
        let descriptors = loader::read_topology_file(path)?;
        Self::from_descriptors(descriptors)
    }

    /// Build a validated topology from raw descriptors.
    pub fn from_descriptors(descriptors: Vec<SwitchDescriptor>) -> Result<Self, TopologyError> {
        if descriptors.is_empty() {
            return Err(TopologyError::NoSwitches);
        }

        let mut pending: Vec<PendingSwitch> = Vec::with_capacity(descriptors.len());
        let mut switch_lookup: HashMap<String, usize> = HashMap::new();
        let mut nodes: Vec<NodeRecord> = Vec::new();
        let mut node_lookup: HashMap<String, usize> = HashMap::new();

        for desc in descriptors {
            if switch_lookup.contains_key(&desc.name) {
                warn!(switch = %desc.name, "Switch has already been defined, ignoring duplicate");
                continue;
            }

            let mut sw = PendingSwitch {
                name: desc.name,
                link_speed: desc.link_speed,
                nodes: desc.nodes,
                switches: desc.switches,
                level: None,
                node_bitmap: NodeSet::new(),
                child_names: NodeSet::new(),
            };

            match (&sw.nodes, &sw.switches) {
                (Some(expr), None) => {
                    let names = hostlist::expand(expr).map_err(|source| {
                        TopologyError::InvalidNodeList {
                            switch: sw.name.clone(),
                            expr: expr.clone(),
                            source,
                        }
                    })?;
                    for name in names {
                        if !node_lookup.contains_key(&name) {
                            node_lookup.insert(name.clone(), nodes.len());
                            nodes.push(NodeRecord {
                                name: name.clone(),
                                rank: 0,
                            });
                        }
                        sw.node_bitmap.insert(name);
                    }
                    sw.level = Some(0);
                }
                (None, Some(expr)) => {
                    let names = hostlist::expand(expr).map_err(|source| {
                        TopologyError::InvalidSwitchList {
                            switch: sw.name.clone(),
                            expr: expr.clone(),
                            source,
                        }
                    })?;
                    sw.child_names = names.into_iter().collect();
                }
                (Some(_), Some(_)) => {
                    warn!(switch = %sw.name, "switch has both child switches and nodes, ignoring");
                    continue;
                }
                (None, None) => {
                    warn!(switch = %sw.name, "switch configuration lacks children, ignoring");
                    continue;
                }
            }

            debug!(
                switch = %sw.name,
                leaf = sw.level.is_some(),
                nodes = sw.node_bitmap.len(),
                children = sw.child_names.len(),
                "switch record created"
            );
            switch_lookup.insert(sw.name.clone(), pending.len());
            pending.push(sw);
        }

        if pending.is_empty() {
            return Err(TopologyError::NoSwitches);
        }

        check_child_references(&pending, &switch_lookup)?;
        resolve_levels(&mut pending, &switch_lookup)?;

        let levels = pending.iter().filter_map(|s| s.level).max().unwrap_or(0);
        debug!("Switch levels: {}", levels);

        for sw in &pending {
            if sw.node_bitmap.is_empty() {
                warn!(switch = %sw.name, "switch has no nodes");
            }
        }

        let child_names: Vec<NodeSet> = pending
            .iter()
            .map(|s| s.child_names.clone())
            .collect();

        let mut switches: Vec<SwitchRecord> = pending
            .into_iter()
            .enumerate()
            .map(|(i, p)| SwitchRecord {
                name: p.name,
                // every level is resolved at this point
                level: p.level.unwrap_or_default(),
                link_speed: p.link_speed,
                node_bitmap: p.node_bitmap,
                nodes: p.nodes,
                switches: p.switches,
                child_indices: Vec::new(),
                descendant_indices: Vec::new(),
                parent_index: i,
                distances: Vec::new(),
            })
            .collect();

        link_children(&mut switches, &child_names, &switch_lookup)?;
        link_descendants(&mut switches, levels);

        let children: Vec<Vec<usize>> = switches.iter().map(|s| s.child_indices.clone()).collect();
        for (sw, row) in switches.iter_mut().zip(distance::distance_matrix(&children)) {
            sw.distances = row;
        }

        info!(
            switch_count = switches.len(),
            leaf_count = switches.iter().filter(|s| s.is_leaf()).count(),
            node_count = nodes.len(),
            levels,
            "topology built"
        );

        Ok(Self {
            switches,
            nodes,
            switch_lookup,
            node_lookup,
            levels,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// The switch table, in file order (duplicates and dropped lines removed).
    pub fn switches(&self) -> &[SwitchRecord] {
        &self.switches
    }

    pub fn switch_count(&self) -> usize {
        self.switches.len()
    }

    /// Index of the switch called `name`.
    pub fn switch_index(&self, name: &str) -> Option<usize> {
        self.switch_lookup.get(name).copied()
    }

    /// The switch called `name`.
    pub fn switch_by_name(&self, name: &str) -> Option<&SwitchRecord> {
        self.switch_index(name).map(|i| &self.switches[i])
    }

    /// Leaf switches with their table indices, in table order.
    pub fn leaf_switches(&self) -> impl Iterator<Item = (usize, &SwitchRecord)> {
        self.switches.iter().enumerate().filter(|(_, s)| s.is_leaf())
    }

    /// Highest switch level in the table.
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Node table in first-seen order.  Every rank is `0`; see
    /// [`ranked_nodes`](Self::ranked_nodes).
    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    /// Returns `true` if some leaf switch lists `name`.
    pub fn contains_node(&self, name: &str) -> bool {
        self.node_lookup.contains_key(name)
    }

    // ── Node ranking ──────────────────────────────────────────────────────────

    /// Assign every node the rank of its leaf switch.
    ///
    /// Leaf switches are numbered 1, 2, … in table order; all nodes under a
    /// leaf share its number, so sorting nodes by rank groups them by leaf
    /// switch.  A node listed by several leaves keeps the last one.
    pub fn ranked_nodes(&self) -> Vec<NodeRecord> {
        let mut ranked = self.nodes.clone();

        for (switch_rank, (_, sw)) in (1u32..).zip(self.leaf_switches()) {
            for name in &sw.node_bitmap {
                if let Some(&n) = self.node_lookup.get(name) {
                    ranked[n].rank = switch_rank;
                    debug!(node = %name, rank = switch_rank, "node ranked");
                }
            }
        }

        ranked
    }
}

// ── Construction helpers ──────────────────────────────────────────────────────

/// Every child name must refer to a defined switch other than the parent.
fn check_child_references(
    pending: &[PendingSwitch],
    lookup: &HashMap<String, usize>,
) -> Result<(), TopologyError> {
    for (i, sw) in pending.iter().enumerate() {
        for child in &sw.child_names {
            match lookup.get(child) {
                Some(&j) if j != i => {}
                _ => {
                    return Err(TopologyError::InvalidChild {
                        switch: sw.name.clone(),
                        child: child.clone(),
                    })
                }
            }
        }
    }
    Ok(())
}

/// Resolve levels and node sets bottom-up.
///
/// Each pass resolves every switch whose children are all resolved; switches
/// resolved earlier in the same pass count.  A configuration that still has
/// unresolved switches after [`MAX_RESOLVE_PASSES`] passes has a cycle.
fn resolve_levels(
    pending: &mut [PendingSwitch],
    lookup: &HashMap<String, usize>,
) -> Result<(), TopologyError> {
    let mut passes = 0;
    loop {
        passes += 1;
        let mut resolved = true;

        for i in 0..pending.len() {
            if pending[i].level.is_some() {
                continue;
            }

            let mut level = 0;
            let mut node_bitmap = NodeSet::new();
            let mut ready = true;
            for child in &pending[i].child_names {
                let c = &pending[lookup[child]];
                match c.level {
                    Some(child_level) => {
                        level = level.max(child_level + 1);
                        node_bitmap.union(&c.node_bitmap);
                    }
                    None => {
                        ready = false;
                        break;
                    }
                }
            }

            if ready {
                pending[i].level = Some(level);
                pending[i].node_bitmap = node_bitmap;
            } else {
                resolved = false;
            }
        }

        if resolved {
            debug!(passes, "switch levels resolved");
            return Ok(());
        }
        if passes > MAX_RESOLVE_PASSES {
            let unresolved = pending
                .iter()
                .filter(|s| s.level.is_none())
                .map(|s| s.name.clone())
                .collect();
            return Err(TopologyError::NotATree { passes, unresolved });
        }
    }
}

/// Fill `child_indices` and `parent_index`.  A switch claimed by two parents
/// makes the graph a DAG rather than a tree.
fn link_children(
    switches: &mut [SwitchRecord],
    child_names: &[NodeSet],
    lookup: &HashMap<String, usize>,
) -> Result<(), TopologyError> {
    let mut parents: Vec<Option<usize>> = vec![None; switches.len()];

    for (i, names) in child_names.iter().enumerate() {
        for child in names {
            let j = lookup[child];
            if let Some(prev) = parents[j] {
                return Err(TopologyError::MultipleParents {
                    child: switches[j].name.clone(),
                    first: switches[prev].name.clone(),
                    second: switches[i].name.clone(),
                });
            }
            parents[j] = Some(i);
            switches[i].child_indices.push(j);
        }
    }

    for (j, parent) in parents.into_iter().enumerate() {
        if let Some(p) = parent {
            switches[j].parent_index = p;
        }
    }
    Ok(())
}

/// Fill `descendant_indices` level by level, so every child's list is
/// complete before its parent reads it.
fn link_descendants(switches: &mut [SwitchRecord], levels: u32) {
    for level in 1..=levels {
        for j in 0..switches.len() {
            if switches[j].level != level {
                continue;
            }
            let mut desc: Vec<usize> = Vec::new();
            merge_indices(&mut desc, &switches[j].child_indices);
            for &child in &switches[j].child_indices {
                merge_indices(&mut desc, &switches[child].descendant_indices);
            }
            switches[j].descendant_indices = desc;
        }
    }
}

/// Append every index of `src` not already in `dst`.
fn merge_indices(dst: &mut Vec<usize>, src: &[usize]) {
    for &idx in src {
        if !dst.contains(&idx) {
            dst.push(idx);
        }
    }
}

// ── Test fixtures ─────────────────────────────────────────────────────────────


// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(topo: &Topology, name: &str) -> usize {
        topo.switch_index(name).unwrap()
    }

    fn names(set: &NodeSet) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    // ── construction ──────────────────────────────────────────────────────────

    #[test]
    fn topology1_levels() {
        let topo = testdata::load("topology1.conf");
        assert_eq!(topo.switch_count(), 7);
        for name in ["s0", "s1", "s2", "s3"] {
            assert_eq!(topo.switch_by_name(name).unwrap().level, 0, "{name}");
        }
        assert_eq!(topo.switch_by_name("s4").unwrap().level, 1);
        assert_eq!(topo.switch_by_name("s5").unwrap().level, 1);
        assert_eq!(topo.switch_by_name("s6").unwrap().level, 2);
        assert_eq!(topo.levels(), 2);
    }

    #[test]
    fn leaf_switches_are_exactly_the_node_list_switches() {
        for file in ["topology1.conf", "topology2.conf", "topology3.conf"] {
            let topo = testdata::load(file);
            for sw in topo.switches() {
                assert_eq!(sw.is_leaf(), sw.nodes.is_some(), "{file}: {}", sw.name);
                assert_eq!(sw.is_leaf(), sw.child_indices.is_empty(), "{file}: {}", sw.name);
            }
        }
    }

    #[test]
    fn internal_node_sets_are_union_of_children() {
        for file in ["topology1.conf", "topology2.conf", "topology3.conf"] {
            let topo = testdata::load(file);
            for sw in topo.switches().iter().filter(|s| !s.is_leaf()) {
                let mut union = NodeSet::new();
                for &c in &sw.child_indices {
                    union.union(&topo.switches()[c].node_bitmap);
                }
                assert_eq!(union, sw.node_bitmap, "{file}: {}", sw.name);
            }
        }
    }

    #[test]
    fn internal_level_is_one_above_highest_child() {
        let topo = testdata::load("topology3.conf");
        for sw in topo.switches().iter().filter(|s| !s.is_leaf()) {
            let max_child = sw
                .child_indices
                .iter()
                .map(|&c| topo.switches()[c].level)
                .max()
                .unwrap();
            assert_eq!(sw.level, max_child + 1, "{}", sw.name);
        }
    }

    #[test]
    fn node_sets_and_node_table() {
        let topo = testdata::load("topology1.conf");
        assert_eq!(
            names(&topo.switch_by_name("s4").unwrap().node_bitmap),
            vec!["tu-x0", "tu-x1", "tu-x2", "tu-x3"]
        );
        assert_eq!(topo.switch_by_name("s6").unwrap().node_bitmap.len(), 8);

        let table: Vec<&str> = topo.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(
            table,
            vec!["tu-x0", "tu-x1", "tu-x2", "tu-x3", "tux4", "tux5", "tux6", "tux7"]
        );
        assert!(topo.nodes().iter().all(|n| n.rank == 0));
        assert!(topo.contains_node("tux7"));
        assert!(!topo.contains_node("tux8"));
    }

    #[test]
    fn parent_child_and_descendant_indices() {
        let topo = testdata::load("topology1.conf");
        let (s0, s1, s2, s3) = (idx(&topo, "s0"), idx(&topo, "s1"), idx(&topo, "s2"), idx(&topo, "s3"));
        let (s4, s5, s6) = (idx(&topo, "s4"), idx(&topo, "s5"), idx(&topo, "s6"));

        assert_eq!(topo.switches()[s4].child_indices, vec![s0, s1]);
        assert_eq!(topo.switches()[s6].child_indices, vec![s4, s5]);

        assert_eq!(topo.switches()[s0].parent_index, s4);
        assert_eq!(topo.switches()[s3].parent_index, s5);
        assert_eq!(topo.switches()[s5].parent_index, s6);
        assert_eq!(topo.switches()[s6].parent_index, s6, "root is its own parent");

        assert_eq!(
            topo.switches()[s6].descendant_indices,
            vec![s4, s5, s0, s1, s2, s3]
        );
        assert_eq!(topo.switches()[s5].descendant_indices, vec![s2, s3]);
        assert!(topo.switches()[s0].descendant_indices.is_empty());
    }

    #[test]
    fn node_shared_by_two_leaves_is_counted_once_above_them() {
        let topo = Topology::from_descriptors(vec![
            SwitchDescriptor::leaf("a1", "x[1,11]"),
            SwitchDescriptor::leaf("a2", "x[2-3,11]"),
            SwitchDescriptor::internal("p1", "a[1-2]"),
        ])
        .unwrap();
        let p1 = topo.switch_by_name("p1").unwrap();
        assert_eq!(names(&p1.node_bitmap), vec!["x1", "x2", "x3", "x11"]);
        assert_eq!(topo.nodes().len(), 4);
    }

    #[test]
    fn duplicate_switch_name_keeps_first_definition() {
        let topo = Topology::from_descriptors(vec![
            SwitchDescriptor::leaf("s0", "n[1-2]"),
            SwitchDescriptor::leaf("s0", "n[3-4]"),
            SwitchDescriptor::internal("top", "s[0]"),
        ])
        .unwrap();
        assert_eq!(topo.switch_count(), 2);
        assert_eq!(
            names(&topo.switch_by_name("s0").unwrap().node_bitmap),
            vec!["n1", "n2"]
        );
        assert!(!topo.contains_node("n3"));
    }

    #[test]
    fn switch_with_both_lists_is_dropped() {
        let both = SwitchDescriptor {
            name: "odd".into(),
            nodes: Some("n[9]".into()),
            switches: Some("s[0]".into()),
            ..Default::default()
        };
        let topo =
            Topology::from_descriptors(vec![SwitchDescriptor::leaf("s0", "n[1]"), both]).unwrap();
        assert_eq!(topo.switch_count(), 1);
        assert!(topo.switch_by_name("odd").is_none());
    }

    #[test]
    fn forest_roots_are_their_own_parents() {
        let topo = Topology::from_descriptors(vec![
            SwitchDescriptor::leaf("a0", "n[1-2]"),
            SwitchDescriptor::leaf("b0", "m[1-2]"),
        ])
        .unwrap();
        assert_eq!(topo.switches()[0].parent_index, 0);
        assert_eq!(topo.switches()[1].parent_index, 1);
        assert_eq!(topo.switches()[0].distances[1], INFINITE);
    }

    // ── construction failures ─────────────────────────────────────────────────

    #[test]
    fn empty_descriptor_list_fails() {
        let err = Topology::from_descriptors(vec![]).unwrap_err();
        assert!(matches!(err, TopologyError::NoSwitches));
    }

    #[test]
    fn dangling_child_reference_fails() {
        let err = Topology::from_descriptors(vec![
            SwitchDescriptor::leaf("s0", "n[1-2]"),
            SwitchDescriptor::internal("top", "s[0,5]"),
        ])
        .unwrap_err();
        match err {
            TopologyError::InvalidChild { switch, child } => {
                assert_eq!(switch, "top");
                assert_eq!(child, "s5");
            }
            other => panic!("expected InvalidChild, got {other:?}"),
        }
    }

    #[test]
    fn self_reference_fails() {
        let err = Topology::from_descriptors(vec![
            SwitchDescriptor::leaf("s0", "n[1-2]"),
            SwitchDescriptor::internal("s1", "s[0-1]"),
        ])
        .unwrap_err();
        assert!(matches!(err, TopologyError::InvalidChild { .. }));
    }

    #[test]
    fn cycle_fails_within_pass_bound() {
        let err = Topology::from_descriptors(vec![
            SwitchDescriptor::leaf("leaf1", "n[1-2]"),
            SwitchDescriptor::internal("a1", "b[1]"),
            SwitchDescriptor::internal("b1", "a[1]"),
        ])
        .unwrap_err();
        match err {
            TopologyError::NotATree { passes, unresolved } => {
                assert_eq!(passes, MAX_RESOLVE_PASSES + 1);
                assert_eq!(unresolved, vec!["a1".to_string(), "b1".to_string()]);
            }
            other => panic!("expected NotATree, got {other:?}"),
        }
    }

    #[test]
    fn child_with_two_parents_fails() {
        let err = Topology::from_descriptors(vec![
            SwitchDescriptor::leaf("s0", "n[1]"),
            SwitchDescriptor::leaf("s1", "n[2]"),
            SwitchDescriptor::internal("p1", "s[0-1]"),
            SwitchDescriptor::internal("p2", "s[1]"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            TopologyError::MultipleParents { ref child, .. } if child == "s1"
        ));
    }

    #[test]
    fn malformed_node_expression_is_recoverable_error() {
        let err = Topology::from_descriptors(vec![SwitchDescriptor::leaf("s0", "node1")])
            .unwrap_err();
        assert!(matches!(err, TopologyError::InvalidNodeList { .. }));
        assert!(err.to_string().contains("s0"));
    }

    #[test]
    fn malformed_switch_expression_is_recoverable_error() {
        let err = Topology::from_descriptors(vec![
            SwitchDescriptor::leaf("s0", "n[1]"),
            SwitchDescriptor::internal("top", "s0"),
        ])
        .unwrap_err();
        assert!(matches!(err, TopologyError::InvalidSwitchList { .. }));
    }

    #[test]
    fn missing_file_fails_load() {
        let err = Topology::load(Path::new("/nonexistent/topology.conf")).unwrap_err();
        assert!(matches!(err, TopologyError::Read { .. }));
    }

    // ── distances ─────────────────────────────────────────────────────────────

    #[test]
    fn distance_matrix_properties() {
        for file in ["topology1.conf", "topology2.conf", "topology3.conf"] {
            let topo = testdata::load(file);
            let sw = topo.switches();
            let n = sw.len();
            for i in 0..n {
                assert_eq!(sw[i].distances.len(), n);
                assert_eq!(sw[i].distances[i], 0);
                for &c in &sw[i].child_indices {
                    assert_eq!(sw[i].distances[c], 1);
                    assert_eq!(sw[c].distances[i], 1);
                }
                for j in 0..n {
                    assert_eq!(sw[i].distances[j], sw[j].distances[i]);
                    for k in 0..n {
                        assert!(
                            sw[i].distances[k]
                                <= distance::dist_add(sw[i].distances[j], sw[j].distances[k])
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn leaf_to_leaf_distances() {
        let topo = testdata::load("topology3.conf");
        let leaf1 = topo.switch_by_name("leaf1").unwrap();
        assert_eq!(leaf1.distances[idx(&topo, "leaf2")], 2);
        assert_eq!(leaf1.distances[idx(&topo, "leaf3")], 4);
        assert_eq!(leaf1.distances[idx(&topo, "core")], 2);
    }

    // ── ranking ───────────────────────────────────────────────────────────────

    #[test]
    fn nodes_ranked_by_leaf_switch() {
        let topo = testdata::load("topology1.conf");
        let ranked = topo.ranked_nodes();
        let ranks: Vec<(&str, u32)> = ranked.iter().map(|n| (n.name.as_str(), n.rank)).collect();
        assert_eq!(
            ranks,
            vec![
                ("tu-x0", 1),
                ("tu-x1", 1),
                ("tu-x2", 2),
                ("tu-x3", 2),
                ("tux4", 3),
                ("tux5", 3),
                ("tux6", 4),
                ("tux7", 4),
            ]
        );
        // the stored table is untouched
        assert!(topo.nodes().iter().all(|n| n.rank == 0));
    }

    #[test]
    fn topology_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Topology>();
    }
}
