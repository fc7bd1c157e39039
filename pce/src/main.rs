// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all, clippy::pedantic, clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![deny(rustdoc::all)]
#![allow(rustdoc::missing_crate_level_docs)]

mod args;
mod runner;

use crate::args::{CmdArgs, Parser};
use crate::runner::run;

use config::PceConfig;
use engine::{Pce, PceParams, PceParamsBuilder};
use std::process::ExitCode;
use topology::{SnapshotWriter, TopologySnapshot};
use tracectl::{get_trace_ctl, trace_target};
use tracing::{error, info, level_filters::LevelFilter};

trace_target!("pce", LevelFilter::INFO, &["pce"]);
fn init_logging() {
    let tctl = get_trace_ctl();
    tctl.set_default_level(LevelFilter::INFO);
}

/// The configuration file if one is given, defaults otherwise. Command line
/// options take precedence over the file.
fn load_config(args: &CmdArgs) -> Result<PceConfig, String> {
    let mut config = match args.config() {
        Some(path) => PceConfig::load(path).map_err(|e| e.to_string())?,
        None => PceConfig::default(),
    };
    if let Some(snapshot) = args.snapshot() {
        config.snapshot = Some(snapshot.to_path_buf());
    }
    if let Some(tracing) = args.tracing() {
        config.tracing = Some(tracing.clone());
    }
    config.service_layer |= args.service_layer();
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn build_params(config: &PceConfig) -> Result<PceParams, String> {
    let mut builder = PceParamsBuilder::default();
    builder
        .name(config.name.as_str())
        .service_layer(config.service_layer)
        .default_vlans(config.vlan_ranges().map_err(|e| e.to_string())?);
    if let Some(deadline) = config.deadline() {
        builder.deadline(deadline);
    }
    builder.build().map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    /* parse cmd line args */
    let args = CmdArgs::parse();

    /* initialize logging */
    init_logging();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(tracing) = &config.tracing
        && let Err(e) = get_trace_ctl().setup_from_string(tracing)
    {
        error!("Invalid tracing configuration: {e}");
        return ExitCode::FAILURE;
    }
    if args.show_tracing_tags() {
        get_trace_ctl().dump_targets_by_tag();
        return ExitCode::SUCCESS;
    }
    if args.show_tracing_targets() {
        get_trace_ctl().dump();
        return ExitCode::SUCCESS;
    }

    let params = match build_params(&config) {
        Ok(params) => params,
        Err(e) => {
            error!("Could not build PCE parameters: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("{params}");

    let Some(path) = config.snapshot.as_deref() else {
        error!("No topology snapshot given");
        return ExitCode::FAILURE;
    };
    let snapshot = match TopologySnapshot::load(path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let (writer, reader) = SnapshotWriter::new_with_data(snapshot);
    let pce = Pce::new(params, reader);

    let Some(command) = args.command() else {
        info!("Topology loaded, nothing to compute");
        return ExitCode::SUCCESS;
    };
    match run(&pce, &writer, command) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
