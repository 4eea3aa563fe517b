//! The `config` command group.

use clap::{value_parser, Arg, Command};
use std::path::PathBuf;

use super::params::{
    format_arg, COMMAND_CONFIG, COMMAND_EXPORT, COMMAND_GET, COMMAND_PATH, COMMAND_SET,
    PARAMETER_NAME, PARAMETER_OUTPUT, PARAMETER_VALUE,
};

pub fn config_command() -> Command {
    Command::new(COMMAND_CONFIG)
        .about("Manage gwadm configuration")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_GET)
                .about("Print the resolved configuration")
                .arg(format_arg()),
        )
        .subcommand(
            Command::new(COMMAND_SET)
                .about("Set one configuration property")
                .arg(
                    Arg::new(PARAMETER_NAME)
                        .required(true)
                        .help("Property name, e.g. customer_id or num_threads"),
                )
                .arg(Arg::new(PARAMETER_VALUE).required(true).help("Property value")),
        )
        .subcommand(
            Command::new(COMMAND_PATH).about("Print the configuration file path"),
        )
        .subcommand(
            Command::new(COMMAND_EXPORT)
                .about("Write the configuration to a file")
                .arg(
                    Arg::new(PARAMETER_OUTPUT)
                        .short('o')
                        .long(PARAMETER_OUTPUT)
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Destination file"),
                ),
        )
}
