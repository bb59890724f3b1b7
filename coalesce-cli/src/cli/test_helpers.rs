//! Small helpers shared across CLI tests.

use super::commands::run_command;
use super::{CliError, RunCommand, Topology};

pub(super) fn run_args(topology: Topology, width: usize, height: usize) -> RunCommand {
    RunCommand {
        topology,
        width,
        height,
        probability: 0.5,
        seed: 7,
        site_limit: None,
        top: 3,
        paint: false,
    }
}

pub(super) fn run_command_expecting_error(cmd: RunCommand, panic_msg: &str) -> CliError {
    match run_command(cmd) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
