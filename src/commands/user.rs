//! The `user` command group.

use clap::{value_parser, Arg, Command};

use super::params::{
    domain_arg, format_arg, COMMAND_INFO, COMMAND_LIST, COMMAND_USER, PARAMETER_EMAIL,
    PARAMETER_MAX_RESULTS, PARAMETER_QUERY,
};

pub fn user_command() -> Command {
    Command::new(COMMAND_USER)
        .about("Manage Workspace users")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List all users in the customer account or a domain")
                .arg(domain_arg())
                .arg(
                    Arg::new(PARAMETER_QUERY)
                        .short('q')
                        .long(PARAMETER_QUERY)
                        .help("Directory search clause, e.g. orgUnitPath='/Sales'"),
                )
                .arg(
                    Arg::new(PARAMETER_MAX_RESULTS)
                        .long(PARAMETER_MAX_RESULTS)
                        .value_parser(value_parser!(u32).range(1..=500))
                        .help("Page size requested from the API"),
                )
                .arg(format_arg()),
        )
        .subcommand(
            Command::new(COMMAND_INFO)
                .about("Show one user")
                .arg(
                    Arg::new(PARAMETER_EMAIL)
                        .required(true)
                        .help("Primary email, alias, or unique id of the user"),
                )
                .arg(format_arg()),
        )
}
