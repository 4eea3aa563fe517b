//! CLI command definitions and argument parsing.
//!
//! This module defines the CLI command tree using the clap builder API.
//! Each entity gets its own submodule; shared literals live in `params`.

use clap::{ArgMatches, Command};

pub mod batch;
pub mod config;
pub mod group;
pub mod member;
pub mod params;
pub mod user;

pub use params::{
    COMMAND_BATCH, COMMAND_CONFIG, COMMAND_EXPORT, COMMAND_GET, COMMAND_GROUP, COMMAND_INFO,
    COMMAND_LIST, COMMAND_MEMBER, COMMAND_PATH, COMMAND_RUN, COMMAND_SET, COMMAND_USER,
    PARAMETER_DOMAIN, PARAMETER_EMAIL, PARAMETER_FILE, PARAMETER_FORMAT, PARAMETER_GROUP,
    PARAMETER_MAX_RESULTS, PARAMETER_NAME, PARAMETER_OUTPUT, PARAMETER_QUERY, PARAMETER_ROLES,
    PARAMETER_THREADS, PARAMETER_VALUE,
};

/// Builds the full command tree.
pub fn build_cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(user::user_command())
        .subcommand(group::group_command())
        .subcommand(member::member_command())
        .subcommand(batch::batch_command())
        .subcommand(config::config_command())
}

/// Parses the process arguments against the command tree.
pub fn create_cli_commands() -> ArgMatches {
    build_cli().get_matches()
}
