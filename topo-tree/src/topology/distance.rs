/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Switch-to-switch hop distances.
//!
//! These are free functions over plain index tables so they can be tested
//! without building a whole [`Topology`](super::Topology).

/// Distance sentinel for "unreachable".
pub const INFINITE: u32 = u32::MAX;

/// Saturating distance addition: if either side is [`INFINITE`] the sum is
/// [`INFINITE`], and a finite sum never wraps.
pub fn dist_add(a: u32, b: u32) -> u32 {
    if a == INFINITE || b == INFINITE {
        INFINITE
    } else {
        a.saturating_add(b)
    }
}

/// All-pairs shortest hop distance for a switch table whose direct children
/// are given by `children[i]`.
///
/// Every parent/child edge costs 1 in both directions.  The relaxation is
/// the classic cubic Floyd–Warshall; switch counts are small compared with
/// node counts, so this is fine.
pub fn distance_matrix(children: &[Vec<usize>]) -> Vec<Vec<u32>> {
    let n = children.len();
    let mut dist = vec![vec![INFINITE; n]; n];

    for (i, kids) in children.iter().enumerate() {
        dist[i][i] = 0;
        for &child in kids {
            dist[i][child] = 1;
            dist[child][i] = 1;
        }
    }

    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                let via = dist_add(dist[j][i], dist[i][k]);
                if via < dist[j][k] {
                    dist[j][k] = via;
                }
            }
        }
    }

    dist
}

/// Add `row` into the running total `acc`, entry by entry, with
/// [`dist_add`].
pub fn accumulate(acc: &mut [u32], row: &[u32]) {
    for (total, &d) in acc.iter_mut().zip(row) {
        *total = dist_add(*total, d);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
