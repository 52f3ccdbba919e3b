/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use topo_tree::config::{RequestConfig, ResolvedRequest};
use topo_tree::eval::{NodeEvaluator, TopologyKind};
use topo_tree::topology::Topology;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Topology-aware node selection for switch trees.
///
/// Example:
///   topo-tree -p /etc/slurm-llnl/topology.conf \
///             -a 'tux[0-7]' -r tux4 -c 3
#[derive(Debug, Parser)]
#[command(
    name = "topo-tree",
    about = "Select nodes spanning the fewest leaf switches",
    long_about = None,
)]
struct Cli {
    /// Topology file (defaults to /etc/slurm-llnl/topology.conf).
    #[arg(short = 'p', long = "topology")]
    topology: Option<PathBuf>,

    /// Available node name or hostlist expression.  Repeatable.
    #[arg(short = 'a', long = "available-nodes")]
    available_nodes: Vec<String>,

    /// Required node name or hostlist expression.  Repeatable.
    #[arg(short = 'r', long = "required-nodes")]
    required_nodes: Vec<String>,

    /// Number of nodes to allocate.
    #[arg(short = 'c', long = "requested-node-count")]
    requested_node_count: Option<u32>,

    /// YAML request file; command-line flags override its values.
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Evaluate as a dragonfly topology.
    #[arg(long = "dragonfly", default_value_t = false)]
    dragonfly: bool,

    /// Print the per-leaf-switch node ranking instead of evaluating.
    #[arg(long = "rank", default_value_t = false)]
    rank: bool,
}

impl Cli {
    fn overrides(&self) -> RequestConfig {
        RequestConfig {
            topology: self.topology.clone(),
            available_nodes: self.available_nodes.clone(),
            required_nodes: self.required_nodes.clone(),
            requested_node_count: self.requested_node_count,
            kind: self.dragonfly.then_some(TopologyKind::Dragonfly),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        topology  = ?cli.topology,
        available = ?cli.available_nodes,
        required  = ?cli.required_nodes,
        count     = ?cli.requested_node_count,
        config    = ?cli.config,
        dragonfly = cli.dragonfly,
        rank      = cli.rank,
        "Configuration"
    );

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

/// What one invocation does, with the topology path resolved exactly once.
#[derive(Debug)]
enum Plan {
    Rank(PathBuf),
    Evaluate(ResolvedRequest),
}

impl Plan {
    fn new(cli: &Cli, config: &RequestConfig) -> Result<Self> {
        if cli.rank {
            Ok(Plan::Rank(config.topology_path()))
        } else {
            Ok(Plan::Evaluate(config.resolve()?))
        }
    }

    fn topology_path(&self) -> &Path {
        match self {
            Plan::Rank(path) => path,
            Plan::Evaluate(request) => &request.topology,
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // ── Gather request values ─────────────────────────────────────────────────
    let base = match &cli.config {
        Some(path) => RequestConfig::load_from_file(path)?,
        None => RequestConfig::default(),
    };
    let config = base.merge(cli.overrides());
    let plan = Plan::new(cli, &config)?;

    // ── Load topology ─────────────────────────────────────────────────────────
    let path = plan.topology_path();
    let topology = Topology::load(path)
        .with_context(|| format!("Failed to load topology: {}", path.display()))?;

    let request = match plan {
        Plan::Rank(_) => {
            let ranked = topology.ranked_nodes();
            print!("{}", serde_yaml::to_string(&ranked)?);
            return Ok(());
        }
        Plan::Evaluate(request) => request,
    };

    // ── Evaluate ──────────────────────────────────────────────────────────────
    let evaluator = NodeEvaluator::new(Arc::new(topology)).with_kind(request.kind);
    let allocation = evaluator
        .evaluate(
            &request.available_nodes,
            &request.required_nodes,
            request.requested_node_count,
        )
        .context("Node evaluation failed")?;

    print!("{}", serde_yaml::to_string(&allocation)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use topo_tree::topology::DEFAULT_TOPOLOGY_PATH;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("topo-tree").chain(args.iter().copied()))
    }

    #[test]
    fn rank_plan_needs_only_a_topology() {
        let cli = cli(&["--rank", "-p", "/tmp/t.conf"]);
        let plan = Plan::new(&cli, &cli.overrides()).unwrap();
        assert!(matches!(plan, Plan::Rank(_)));
        assert_eq!(plan.topology_path(), Path::new("/tmp/t.conf"));
    }

    #[test]
    fn evaluate_plan_loads_the_resolved_path() {
        let cli = cli(&["-a", "tux[0-3]", "-c", "2"]);
        let plan = Plan::new(&cli, &cli.overrides()).unwrap();
        let Plan::Evaluate(request) = &plan else {
            panic!("expected an evaluation plan");
        };
        assert_eq!(request.topology, PathBuf::from(DEFAULT_TOPOLOGY_PATH));
        assert_eq!(plan.topology_path(), request.topology.as_path());
    }

    #[test]
    fn evaluate_plan_without_count_fails_before_loading() {
        let cli = cli(&["-a", "tux1", "-p", "/nonexistent/topology.conf"]);
        let err = Plan::new(&cli, &cli.overrides()).unwrap_err();
        assert!(err.to_string().contains("requested node count"));
    }
}
