//! The `batch` command group.

use clap::{value_parser, Arg, Command};
use std::path::PathBuf;

use super::params::{COMMAND_BATCH, COMMAND_RUN, PARAMETER_FILE, PARAMETER_THREADS};

pub fn batch_command() -> Command {
    Command::new(COMMAND_BATCH)
        .about("Run many gwadm commands from a file")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_RUN)
                .about("Execute each line of the file as a gwadm command")
                .arg(
                    Arg::new(PARAMETER_FILE)
                        .long(PARAMETER_FILE)
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to the batch file; one command per line"),
                )
                .arg(
                    Arg::new(PARAMETER_THREADS)
                        .long(PARAMETER_THREADS)
                        .value_parser(value_parser!(usize))
                        .help("Worker pool size; defaults to the configured num_threads"),
                ),
        )
}
