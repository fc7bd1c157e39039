// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

pub(crate) use clap::Parser;
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pce")]
#[command(version = "0.1")]
#[command(about = "Path computation for bandwidth and VLAN constrained circuits", long_about = None)]
pub(crate) struct CmdArgs {
    #[arg(long, value_name = "YAML configuration file")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "YAML topology snapshot")]
    snapshot: Option<PathBuf>,

    #[arg(long, value_name = "tag=level,..")]
    tracing: Option<String>,

    #[arg(long, default_value_t = false, help = "Route over the service layer")]
    service_layer: bool,

    #[arg(long, default_value_t = false, help = "Show the available tracing targets and exit")]
    show_tracing_targets: bool,

    #[arg(long, default_value_t = false, help = "Show the tracing targets by tag and exit")]
    show_tracing_tags: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub(crate) enum Command {
    /// Compute the routes of a circuit between two devices
    ShortestPath {
        a: String,
        z: String,
        #[arg(long, default_value_t = 0, help = "Bandwidth from a to z, in Mbps")]
        az_bw: u32,
        #[arg(long, default_value_t = 0, help = "Bandwidth from z to a, in Mbps")]
        za_bw: u32,
    },
    /// Compute the routes of the pipe described in a YAML file
    Pipe { file: PathBuf },
    /// List the next hops out of the last device of a route prefix
    NextHops {
        #[arg(required = true)]
        prefix: Vec<String>,
    },
    /// Show the logical links of the service layer
    LogicalLinks,
    /// Show the loaded topology
    Topology,
}

impl CmdArgs {
    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }
    pub fn snapshot(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }
    pub fn tracing(&self) -> Option<&String> {
        self.tracing.as_ref()
    }
    pub fn service_layer(&self) -> bool {
        self.service_layer
    }
    pub fn show_tracing_targets(&self) -> bool {
        self.show_tracing_targets
    }
    pub fn show_tracing_tags(&self) -> bool {
        self.show_tracing_tags
    }
    pub fn command(&self) -> Option<&Command> {
        self.command.as_ref()
    }
}
