//! Batch fan-out: run many gwadm commands from a file.
//!
//! Each non-empty line of the batch file is one gwadm command line. The
//! current executable is re-invoked per line as a separate OS process, at
//! most `threads` at a time; the caller blocks until every line has run.
//! Workers share nothing beyond the bounded queue, and there is no
//! cancellation: a hung command holds its slot until the child exits.

use std::path::Path;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read batch file: {0}")]
    Io(#[from] std::io::Error),
    #[error("batch file contains no commands")]
    Empty,
}

/// Outcome of one batch run.
#[derive(Debug, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Splits batch file content into command argument lists.
///
/// Blank lines and `#` comments are skipped. A leading `gwadm` token is
/// tolerated so files read the same as an interactive session transcript.
pub fn parse_batch_lines(content: &str) -> Vec<Vec<String>> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let mut args: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            if args.first().map(String::as_str) == Some("gwadm") {
                args.remove(0);
            }
            args
        })
        .filter(|args| !args.is_empty())
        .collect()
}

async fn run_one(args: Vec<String>) -> bool {
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => {
            error!("cannot locate the gwadm executable: {}", e);
            return false;
        }
    };
    debug!("batch: {}", args.join(" "));
    match tokio::process::Command::new(exe).args(&args).status().await {
        Ok(status) if status.success() => true,
        Ok(status) => {
            error!("batch command failed ({}): {}", status, args.join(" "));
            false
        }
        Err(e) => {
            error!("batch command did not start: {} ({})", e, args.join(" "));
            false
        }
    }
}

/// Runs every command in the batch file, `threads` at a time.
pub async fn run_batch(path: &Path, threads: usize) -> Result<BatchSummary, BatchError> {
    let content = tokio::fs::read_to_string(path).await?;
    let commands = parse_batch_lines(&content);
    if commands.is_empty() {
        return Err(BatchError::Empty);
    }

    let total = commands.len();
    let outcomes: Vec<bool> = stream::iter(commands)
        .map(run_one)
        .buffer_unordered(threads.max(1))
        .collect()
        .await;

    let succeeded = outcomes.iter().filter(|ok| **ok).count();
    Ok(BatchSummary {
        total,
        succeeded,
        failed: total - succeeded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        let content = "\n# provisioning\ngwadm user info a@example.com\n\n   \nuser list --domain example.com\n";
        let commands = parse_batch_lines(content);
        assert_eq!(
            commands,
            vec![
                vec!["user", "info", "a@example.com"]
                    .into_iter()
                    .map(String::from)
                    .collect::<Vec<_>>(),
                vec!["user", "list", "--domain", "example.com"]
                    .into_iter()
                    .map(String::from)
                    .collect::<Vec<_>>(),
            ]
        );
    }

    #[test]
    fn leading_tool_name_is_stripped() {
        let commands = parse_batch_lines("gwadm group list");
        assert_eq!(commands, vec![vec!["group".to_string(), "list".to_string()]]);
    }

    #[test]
    fn empty_file_yields_no_commands() {
        assert!(parse_batch_lines("# nothing here\n\n").is_empty());
    }
}
