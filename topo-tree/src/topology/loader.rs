/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Topology file reader.
//!
//! The expected layout is one switch per line, `Key=Value` tokens separated
//! by whitespace:
//! ```text
//! # leaf switches
//! SwitchName=s0 Nodes=tux[0-3]  LinkSpeed=900
//! SwitchName=s1 Nodes=tux[4-7]  LinkSpeed=900
//! # aggregation
//! SwitchName=s2 Switches=s[0-1] LinkSpeed=1800
//! ```
//!
//! Lines that cannot describe a usable switch are dropped with a warning;
//! only an unreadable file or a file with no usable line fails the load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use super::error::TopologyError;

/// One switch definition exactly as written in the file.
///
/// Exactly one of `nodes` / `switches` is set on every descriptor returned
/// by [`parse_switches`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchDescriptor {
    pub name: String,
    /// Link speed, arbitrary units.  `0` when absent or unparsable.
    pub link_speed: u32,
    /// Hostlist expression of directly attached nodes (leaf switch).
    pub nodes: Option<String>,
    /// Hostlist expression of child switches (internal switch).
    pub switches: Option<String>,
}

impl SwitchDescriptor {
    /// Leaf switch descriptor.
    pub fn leaf(name: impl Into<String>, nodes: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Some(nodes.into()),
            ..Default::default()
        }
    }

    /// Internal switch descriptor.
    pub fn internal(name: impl Into<String>, switches: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            switches: Some(switches.into()),
            ..Default::default()
        }
    }
}

/// Open `path` and parse every switch definition in it.
///
/// # Errors
/// * [`TopologyError::Read`] if the file cannot be opened or read.
/// * [`TopologyError::NoSwitches`] if no line yields a usable descriptor.
pub fn read_topology_file(path: &Path) -> Result<Vec<SwitchDescriptor>, TopologyError> {
    let read_err = |source| TopologyError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_err)?;
    debug!("Reading topology file {}", path.display());

    let list = parse_switches(BufReader::new(file)).map_err(read_err)?;
    if list.is_empty() {
        return Err(TopologyError::NoSwitches);
    }

    info!(
        path = %path.display(),
        switch_count = list.len(),
        "topology file parsed"
    );
    Ok(list)
}

/// Parse switch definitions from any buffered reader.
///
/// Only I/O failures are errors; malformed lines are logged and skipped.
pub fn parse_switches<R: BufRead>(reader: R) -> std::io::Result<Vec<SwitchDescriptor>> {
    let mut list = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;

        // `#` starts a comment anywhere on the line
        let text = match line.split_once('#') {
            Some((before, _)) => before,
            None => line.as_str(),
        };
        if text.trim().is_empty() {
            continue;
        }

        if let Some(desc) = parse_line(text, lineno) {
            list.push(desc);
        }
    }

    Ok(list)
}

fn parse_line(text: &str, lineno: usize) -> Option<SwitchDescriptor> {
    let mut desc = SwitchDescriptor::default();

    for token in text.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            debug!(line = lineno, token, "ignoring token without '='");
            continue;
        };

        match key {
            "SwitchName" => desc.name = value.to_string(),
            "Nodes" if !value.is_empty() => desc.nodes = Some(value.to_string()),
            "Switches" if !value.is_empty() => desc.switches = Some(value.to_string()),
            "Nodes" | "Switches" => {}
            "LinkSpeed" => match value.parse::<u32>() {
                Ok(speed) => desc.link_speed = speed,
                Err(_) => warn!(line = lineno, value, "Failed to parse LinkSpeed"),
            },
            other => debug!(line = lineno, key = other, "ignoring unknown key"),
        }
    }

    if desc.name.is_empty() {
        warn!(line = lineno, "switch definition has no SwitchName, skipping");
        return None;
    }
    match (&desc.nodes, &desc.switches) {
        (Some(_), Some(_)) => {
            warn!(switch = %desc.name, "switch has both child switches and nodes, skipping");
            None
        }
        (None, None) => {
            warn!(switch = %desc.name, "switch has neither child switches nor nodes, skipping");
            None
        }
        _ => Some(desc),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
