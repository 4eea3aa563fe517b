//! Subcommand dispatch: maps parsed arguments onto action handlers.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use gwadm::actions::{self, CliActionError, Context};
use gwadm::batch;
use gwadm::commands::{
    create_cli_commands, COMMAND_BATCH, COMMAND_CONFIG, COMMAND_EXPORT, COMMAND_GET,
    COMMAND_GROUP, COMMAND_INFO, COMMAND_LIST, COMMAND_MEMBER, COMMAND_PATH, COMMAND_RUN,
    COMMAND_SET, COMMAND_USER, PARAMETER_DOMAIN, PARAMETER_EMAIL, PARAMETER_FILE,
    PARAMETER_FORMAT, PARAMETER_GROUP, PARAMETER_MAX_RESULTS, PARAMETER_NAME, PARAMETER_OUTPUT,
    PARAMETER_QUERY, PARAMETER_ROLES, PARAMETER_THREADS, PARAMETER_VALUE,
};
use gwadm::configuration::{Configuration, ConfigurationError};
use gwadm::exit_codes::GwadmExitCode;
use gwadm::format::{Formattable, FormattingError, OutputFormat};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Undefined or unsupported subcommand {0}")]
    UnsupportedSubcommand(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),
    #[error("Formatting error: {0}")]
    FormattingError(#[from] FormattingError),
    #[error("{0}")]
    ActionError(#[from] CliActionError),
    #[error("{failed} of {total} batch commands failed")]
    BatchFailures { failed: usize, total: usize },
}

impl CliError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::UnsupportedSubcommand(_) => GwadmExitCode::UsageError.code(),
            CliError::ConfigurationError(_) => GwadmExitCode::ConfigError.code(),
            CliError::FormattingError(_) => GwadmExitCode::UsageError.code(),
            CliError::ActionError(e) => e.exit_code(),
            CliError::BatchFailures { .. } => 1,
        }
    }
}

fn output_format(matches: &clap::ArgMatches) -> OutputFormat {
    // Safe: clap validates the value set and supplies a default.
    let format = matches.get_one::<String>(PARAMETER_FORMAT).unwrap();
    OutputFormat::from_str(format).unwrap()
}

pub async fn execute_command(mut configuration: Configuration) -> Result<(), CliError> {
    let commands = create_cli_commands();

    match commands.subcommand() {
        // Users
        Some((COMMAND_USER, sub_matches)) => {
            let context = Context::from_configuration(configuration)?;
            match sub_matches.subcommand() {
                Some((COMMAND_LIST, sub_matches)) => {
                    let domain = sub_matches.get_one::<String>(PARAMETER_DOMAIN);
                    let query = sub_matches.get_one::<String>(PARAMETER_QUERY);
                    let max_results = sub_matches.get_one::<u32>(PARAMETER_MAX_RESULTS);
                    actions::users::list_users(
                        &context,
                        domain.map(String::as_str),
                        query.map(String::as_str),
                        max_results.copied(),
                        &output_format(sub_matches),
                    )
                    .await?;
                    Ok(())
                }
                Some((COMMAND_INFO, sub_matches)) => {
                    let email = sub_matches.get_one::<String>(PARAMETER_EMAIL).unwrap();
                    actions::users::user_info(&context, email, &output_format(sub_matches))
                        .await?;
                    Ok(())
                }
                _ => Err(CliError::UnsupportedSubcommand(COMMAND_USER.to_string())),
            }
        }
        // Groups
        Some((COMMAND_GROUP, sub_matches)) => {
            let context = Context::from_configuration(configuration)?;
            match sub_matches.subcommand() {
                Some((COMMAND_LIST, sub_matches)) => {
                    let domain = sub_matches.get_one::<String>(PARAMETER_DOMAIN);
                    actions::groups::list_groups(
                        &context,
                        domain.map(String::as_str),
                        &output_format(sub_matches),
                    )
                    .await?;
                    Ok(())
                }
                Some((COMMAND_INFO, sub_matches)) => {
                    let email = sub_matches.get_one::<String>(PARAMETER_EMAIL).unwrap();
                    actions::groups::group_info(&context, email, &output_format(sub_matches))
                        .await?;
                    Ok(())
                }
                _ => Err(CliError::UnsupportedSubcommand(COMMAND_GROUP.to_string())),
            }
        }
        // Members
        Some((COMMAND_MEMBER, sub_matches)) => {
            let context = Context::from_configuration(configuration)?;
            match sub_matches.subcommand() {
                Some((COMMAND_LIST, sub_matches)) => {
                    let group = sub_matches.get_one::<String>(PARAMETER_GROUP).unwrap();
                    let roles = sub_matches.get_one::<String>(PARAMETER_ROLES);
                    actions::groups::list_members(
                        &context,
                        group,
                        roles.map(String::as_str),
                        &output_format(sub_matches),
                    )
                    .await?;
                    Ok(())
                }
                _ => Err(CliError::UnsupportedSubcommand(COMMAND_MEMBER.to_string())),
            }
        }
        // Batch
        Some((COMMAND_BATCH, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_RUN, sub_matches)) => {
                let file = sub_matches.get_one::<PathBuf>(PARAMETER_FILE).unwrap();
                let threads = sub_matches
                    .get_one::<usize>(PARAMETER_THREADS)
                    .copied()
                    .unwrap_or_else(|| configuration.num_threads());
                let summary = batch::run_batch(file, threads)
                    .await
                    .map_err(CliActionError::from)?;
                eprintln!(
                    "Batch complete: {}/{} commands succeeded",
                    summary.succeeded, summary.total
                );
                if summary.failed > 0 {
                    return Err(CliError::BatchFailures {
                        failed: summary.failed,
                        total: summary.total,
                    });
                }
                Ok(())
            }
            _ => Err(CliError::UnsupportedSubcommand(COMMAND_BATCH.to_string())),
        },
        // Configuration
        Some((COMMAND_CONFIG, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_GET, sub_matches)) => {
                let output = configuration.format(&output_format(sub_matches))?;
                println!("{}", output);
                Ok(())
            }
            Some((COMMAND_SET, sub_matches)) => {
                let name = sub_matches.get_one::<String>(PARAMETER_NAME).unwrap();
                let value = sub_matches.get_one::<String>(PARAMETER_VALUE).unwrap();
                configuration.set_property(name, value)?;
                configuration.save_to_default()?;
                Ok(())
            }
            Some((COMMAND_PATH, _)) => {
                let path = Configuration::get_default_configuration_file_path()?;
                println!("{}", path.display());
                Ok(())
            }
            Some((COMMAND_EXPORT, sub_matches)) => {
                let path = sub_matches.get_one::<PathBuf>(PARAMETER_OUTPUT).unwrap();
                configuration.save(path)?;
                Ok(())
            }
            _ => Err(CliError::UnsupportedSubcommand(COMMAND_CONFIG.to_string())),
        },
        _ => Err(CliError::UnsupportedSubcommand(String::from("unknown"))),
    }
}
