//! Shared command and parameter names for the CLI.
//!
//! Centralizing the literal strings keeps the clap definitions and the
//! dispatch match arms in agreement.

use clap::Arg;

use crate::format::{CSV, JSON};

// Entities
pub const COMMAND_USER: &str = "user";
pub const COMMAND_GROUP: &str = "group";
pub const COMMAND_MEMBER: &str = "member";
pub const COMMAND_BATCH: &str = "batch";
pub const COMMAND_CONFIG: &str = "config";

// Operations
pub const COMMAND_LIST: &str = "list";
pub const COMMAND_INFO: &str = "info";
pub const COMMAND_RUN: &str = "run";
pub const COMMAND_GET: &str = "get";
pub const COMMAND_SET: &str = "set";
pub const COMMAND_PATH: &str = "path";
pub const COMMAND_EXPORT: &str = "export";

// Parameters
pub const PARAMETER_FORMAT: &str = "format";
pub const PARAMETER_DOMAIN: &str = "domain";
pub const PARAMETER_QUERY: &str = "query";
pub const PARAMETER_MAX_RESULTS: &str = "max-results";
pub const PARAMETER_EMAIL: &str = "email";
pub const PARAMETER_GROUP: &str = "group";
pub const PARAMETER_ROLES: &str = "roles";
pub const PARAMETER_FILE: &str = "file";
pub const PARAMETER_THREADS: &str = "threads";
pub const PARAMETER_OUTPUT: &str = "output";
pub const PARAMETER_NAME: &str = "name";
pub const PARAMETER_VALUE: &str = "value";

/// The shared `--format` argument.
pub fn format_arg() -> Arg {
    Arg::new(PARAMETER_FORMAT)
        .short('f')
        .long(PARAMETER_FORMAT)
        .value_parser([JSON, CSV])
        .default_value(JSON)
        .help("Output format")
}

/// The shared `--domain` listing-scope argument.
pub fn domain_arg() -> Arg {
    Arg::new(PARAMETER_DOMAIN)
        .short('d')
        .long(PARAMETER_DOMAIN)
        .help("Restrict the listing to one domain instead of the whole customer")
}
