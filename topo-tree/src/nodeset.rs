/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Ordered name sets used for both node and switch membership.
//!
//! A [`NodeSet`] keeps its members sorted by the integer trailing each name
//! (`tux12` → `12`).  The alphabetic prefix is ignored for ordering, so
//! `tux5` and `node5` compare equal; equal keys keep their insertion order.
//!
//! ```text
//! insert("tux10"), insert("tux2"), insert("tux1")   →   [tux1, tux2, tux10]
//! ```
//!
//! Every operation is infallible and the empty set is a perfectly normal
//! value (most per-switch working sets start out empty).

use std::fmt;

use serde::Serialize;

// ── Ordering key ──────────────────────────────────────────────────────────────

/// Sort key for a name: leading letters are stripped and the remainder is
/// parsed as a signed integer.  Anything unparsable (`tu-x0`, `node5a`,
/// `switch`) sorts as `0`.
pub fn suffix_key(name: &str) -> i64 {
    name.trim_start_matches(char::is_alphabetic)
        .parse()
        .unwrap_or(0)
}

// ── NodeSet ───────────────────────────────────────────────────────────────────

/// Ordered set of distinct node (or switch) names.
///
/// Serialises as a plain sequence of names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NodeSet {
    names: Vec<String>,
}

impl NodeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `name` is a member.
    pub fn contains(&self, name: &str) -> bool {
        let key = suffix_key(name);
        let start = self.names.partition_point(|n| suffix_key(n) < key);
        self.names[start..]
            .iter()
            .take_while(|n| suffix_key(n) == key)
            .any(|n| n == name)
    }

    /// Adds `name`, keeping the set ordered.
    ///
    /// Returns `true` iff the name was not already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        // After every member with an equal or smaller key → stable order.
        let key = suffix_key(&name);
        let pos = self.names.partition_point(|n| suffix_key(n) <= key);
        self.names.insert(pos, name);
        true
    }

    /// In-place set union.
    pub fn union(&mut self, other: &NodeSet) {
        // membership is checked against the still-sorted `self`
        let missing: Vec<String> = other
            .names
            .iter()
            .filter(|n| !self.contains(n))
            .cloned()
            .collect();
        if missing.is_empty() {
            return;
        }
        self.names.extend(missing);
        self.names.sort_by_key(|n| suffix_key(n));
    }

    /// In-place set intersection: keeps only members also present in `other`.
    pub fn intersect(&mut self, other: &NodeSet) {
        self.names.retain(|n| other.contains(n));
    }

    /// Returns `true` if every member of `self` is also in `other`.
    pub fn is_subset_of(&self, other: &NodeSet) -> bool {
        self.names.iter().all(|n| other.contains(n))
    }

    /// Returns `true` if the two sets share at least one member.
    pub fn overlaps(&self, other: &NodeSet) -> bool {
        self.names.iter().any(|n| other.contains(n))
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Removes every member.
    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// Iterates members in set order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.names.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for NodeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = NodeSet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

impl IntoIterator for NodeSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

impl fmt::Display for NodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join(","))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
