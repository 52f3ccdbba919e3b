/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! topo-tree – topology-aware node selection
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── nodeset         – ordered node-name sets (numeric suffix order)
//! ├── topology/       – switch tree: file loader, graph builder, distances
//! ├── eval/           – node evaluator (tree algorithm, dragonfly stub)
//! └── config/         – YAML request file + command-line overrides
//! ```

pub mod config;
pub mod eval;
pub mod nodeset;
pub mod topology;
