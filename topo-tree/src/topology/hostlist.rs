/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Hostlist range expressions: `prefix[range(,range)*]`.
//!
//! `range` is either a single number `N` or an inclusive span `N1-N2`.
//! Zero padding is inferred per comma-separated term from its first literal:
//!
//! ```text
//! worker[001,134-136]   →   worker001 worker134 worker135 worker136
//! tux[08-10]            →   tux08 tux09 tux10
//! s[0-2]                →   s0 s1 s2
//! ```

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// `prefix[ranges]`, anchored at both ends.  The prefix may contain anything
/// except brackets, commas and whitespace (`tu-x`, `rack1-node`, …).
static HOSTLIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^\[\],\s]+)\[([0-9,\-]+)\]$").expect("Invalid hostlist regex")
});

/// Upper bound on the names one expression may expand to.
pub const MAX_HOSTLIST_NODES: usize = 1 << 20;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors produced while expanding a hostlist expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostlistError {
    /// The expression does not have the `prefix[ranges]` shape (this includes
    /// a plain name without brackets).
    #[error("invalid hostlist expression '{0}'")]
    Malformed(String),

    /// A term contains something that is not a non-negative integer.
    #[error("invalid number '{term}' in hostlist expression '{expr}'")]
    InvalidNumber { expr: String, term: String },

    /// A span whose lower bound is greater than its upper bound.
    #[error("reversed range '{term}' in hostlist expression '{expr}'")]
    ReversedRange { expr: String, term: String },

    #[error("hostlist expression '{expr}' expands to more than {limit} names")]
    TooLarge { expr: String, limit: usize },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Expand a bracketed range expression into individual names, in the order
/// the terms are written.
///
/// A plain name (`node1`) is rejected: topology files always use the range
/// syntax for `Nodes=` and `Switches=`.
pub fn expand(expr: &str) -> Result<Vec<String>, HostlistError> {
    let caps = HOSTLIST
        .captures(expr.trim())
        .ok_or_else(|| HostlistError::Malformed(expr.to_string()))?;

    let prefix = &caps[1];
    let mut names = Vec::new();

    for term in caps[2].split(',') {
        let (lo_str, hi_str) = term.split_once('-').unwrap_or((term, term));
        let lo = parse_bound(expr, term, lo_str)?;
        let hi = parse_bound(expr, term, hi_str)?;

        if lo > hi {
            return Err(HostlistError::ReversedRange {
                expr: expr.to_string(),
                term: term.to_string(),
            });
        }

        let width = if lo_str.starts_with('0') {
            lo_str.len()
        } else {
            0
        };

        let span = usize::try_from(hi - lo).unwrap_or(usize::MAX).saturating_add(1);
        if names.len().saturating_add(span) > MAX_HOSTLIST_NODES {
            return Err(HostlistError::TooLarge {
                expr: expr.to_string(),
                limit: MAX_HOSTLIST_NODES,
            });
        }

        names.extend((lo..=hi).map(|n| format!("{prefix}{n:0width$}")));
    }

    Ok(names)
}

/// Like [`expand`], but a plain name is accepted and returned as-is.
///
/// Used for node lists supplied by callers (`-a tux4 -a tux[8-11]`).
pub fn expand_names(expr: &str) -> Result<Vec<String>, HostlistError> {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err(HostlistError::Malformed(expr.to_string()));
    }
    if trimmed.contains('[') {
        expand(trimmed)
    } else {
        Ok(vec![trimmed.to_string()])
    }
}

fn parse_bound(expr: &str, term: &str, literal: &str) -> Result<u64, HostlistError> {
    literal
        .parse::<u64>()
        .map_err(|_| HostlistError::InvalidNumber {
            expr: expr.to_string(),
            term: term.to_string(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
