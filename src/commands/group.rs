//! The `group` command group.

use clap::{Arg, Command};

use super::params::{
    domain_arg, format_arg, COMMAND_GROUP, COMMAND_INFO, COMMAND_LIST, PARAMETER_EMAIL,
};

pub fn group_command() -> Command {
    Command::new(COMMAND_GROUP)
        .about("Manage Workspace groups")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List all groups in the customer account or a domain")
                .arg(domain_arg())
                .arg(format_arg()),
        )
        .subcommand(
            Command::new(COMMAND_INFO)
                .about("Show one group")
                .arg(
                    Arg::new(PARAMETER_EMAIL)
                        .required(true)
                        .help("Email, alias, or unique id of the group"),
                )
                .arg(format_arg()),
        )
}
