/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Leaf switch ranking used by the greedy fill.

use std::cmp::Ordering;

use crate::topology::{Topology, INFINITE};

/// Compare switch `i` against switch `j` for a request that still needs
/// `remaining` nodes.  `Greater` favours `i`, `Less` favours `j`.
///
/// While neither switch fits the request and their parents differ, both are
/// replaced by their parents, so two leaves are judged by the subtrees they
/// sit in.  Then:
///
/// * both fit: fewer nodes wins (tightest fit);
/// * one fits: it wins;
/// * neither fits: more nodes wins, then the lower level.
pub fn compare_switches(
    topology: &Topology,
    mut i: usize,
    mut j: usize,
    counts: &[usize],
    remaining: i64,
) -> Ordering {
    let switches = topology.switches();
    let fits = |k: usize| counts[k] as i64 >= remaining;

    loop {
        match (fits(i), fits(j)) {
            (true, true) => match counts[j].cmp(&counts[i]) {
                Ordering::Equal => break,
                order => return order,
            },
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }

        let (pi, pj) = (switches[i].parent_index, switches[j].parent_index);
        if (pi != i || pj != j) && pi != pj {
            i = pi;
            j = pj;
            continue;
        }
        break;
    }

    counts[i]
        .cmp(&counts[j])
        .then_with(|| switches[j].level.cmp(&switches[i].level))
}

/// Fold leaf switch `i` into the running best choice.
///
/// The first viable switch (some nodes left, reachable) is taken as is.
/// After that `i` replaces `best` when it is closer and not worse, or
/// equally close and strictly better.
pub fn choose_best_switch(
    topology: &Topology,
    dist: &[u32],
    counts: &[usize],
    remaining: i64,
    i: usize,
    best: Option<usize>,
) -> Option<usize> {
    let viable = counts[i] > 0 && dist[i] < INFINITE;

    match best {
        Some(b) if viable => {
            let order = compare_switches(topology, i, b, counts, remaining);
            if (dist[i] < dist[b] && order != Ordering::Less)
                || (dist[i] == dist[b] && order == Ordering::Greater)
            {
                Some(i)
            } else {
                best
            }
        }
        None if viable => Some(i),
        _ => best,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::testdata;

    /// Switch counts for topology1 (s0..s6) with 1 available node on every
    /// leaf except s3, which has 2.
    fn counts() -> Vec<usize> {
        vec![1, 1, 1, 2, 2, 3, 5]
    }

    #[test]
    fn both_fit_prefers_tighter_switch() {
        let topo = testdata::load("topology1.conf");
        let c = counts();
        assert_eq!(compare_switches(&topo, 0, 3, &c, 1), Ordering::Greater);
        assert_eq!(compare_switches(&topo, 3, 0, &c, 1), Ordering::Less);
    }

    #[test]
    fn fitting_switch_beats_non_fitting() {
        let topo = testdata::load("topology1.conf");
        let c = counts();
        assert_eq!(compare_switches(&topo, 3, 0, &c, 2), Ordering::Greater);
        assert_eq!(compare_switches(&topo, 0, 3, &c, 2), Ordering::Less);
    }

    #[test]
    fn siblings_that_do_not_fit_compare_by_count() {
        let topo = testdata::load("topology1.conf");
        let c = counts();
        // s2 and s3 share s5, so no climbing happens
        assert_eq!(compare_switches(&topo, 3, 2, &c, 3), Ordering::Greater);
        assert_eq!(compare_switches(&topo, 0, 1, &c, 3), Ordering::Equal);
    }

    #[test]
    fn cousins_climb_to_their_parents() {
        let topo = testdata::load("topology1.conf");
        let c = counts();
        // neither leaf fits 3; s2's parent s5 does, s0's parent s4 does not
        assert_eq!(compare_switches(&topo, 2, 0, &c, 3), Ordering::Greater);
        assert_eq!(compare_switches(&topo, 0, 2, &c, 3), Ordering::Less);
    }

    #[test]
    fn climbing_stops_at_shared_root() {
        let topo = testdata::load("topology1.conf");
        let c = vec![1, 1, 1, 1, 2, 2, 4];
        assert_eq!(compare_switches(&topo, 2, 0, &c, 3), Ordering::Equal);
    }

    #[test]
    fn first_viable_switch_is_accepted() {
        let topo = testdata::load("topology1.conf");
        let c = counts();
        let dist = vec![0; 7];
        assert_eq!(choose_best_switch(&topo, &dist, &c, 1, 0, None), Some(0));
    }

    #[test]
    fn empty_or_unreachable_switch_is_never_chosen() {
        let topo = testdata::load("topology1.conf");
        let mut c = counts();
        c[0] = 0;
        let mut dist = vec![0; 7];
        dist[1] = INFINITE;
        assert_eq!(choose_best_switch(&topo, &dist, &c, 1, 0, None), None);
        assert_eq!(choose_best_switch(&topo, &dist, &c, 1, 1, None), None);
        assert_eq!(choose_best_switch(&topo, &dist, &c, 1, 0, Some(2)), Some(2));
    }

    #[test]
    fn closer_switch_wins_unless_worse() {
        let topo = testdata::load("topology1.conf");
        let c = counts();
        let dist = vec![4, 4, 2, 2, 3, 1, 2];
        // s2 is closer than s0 and ties it on fit
        assert_eq!(choose_best_switch(&topo, &dist, &c, 1, 2, Some(0)), Some(2));
        // s0 is further from s2
        assert_eq!(choose_best_switch(&topo, &dist, &c, 1, 0, Some(2)), Some(2));
        // s3 is as close as s2 but a looser fit for one node
        assert_eq!(choose_best_switch(&topo, &dist, &c, 1, 3, Some(2)), Some(2));
    }

    #[test]
    fn equal_distance_needs_strictly_better_fit() {
        let topo = testdata::load("topology1.conf");
        let c = counts();
        let dist = vec![0; 7];
        assert_eq!(choose_best_switch(&topo, &dist, &c, 1, 1, Some(0)), Some(0));
        assert_eq!(choose_best_switch(&topo, &dist, &c, 2, 3, Some(0)), Some(3));
    }
}
