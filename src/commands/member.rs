//! The `member` command group.

use clap::{Arg, Command};

use super::params::{
    format_arg, COMMAND_LIST, COMMAND_MEMBER, PARAMETER_GROUP, PARAMETER_ROLES,
};

pub fn member_command() -> Command {
    Command::new(COMMAND_MEMBER)
        .about("Manage group memberships")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List the members of a group")
                .arg(
                    Arg::new(PARAMETER_GROUP)
                        .required(true)
                        .help("Email, alias, or unique id of the group"),
                )
                .arg(
                    Arg::new(PARAMETER_ROLES)
                        .short('r')
                        .long(PARAMETER_ROLES)
                        .help("Comma-separated role filter: owner,manager,member"),
                )
                .arg(format_arg()),
        )
}
