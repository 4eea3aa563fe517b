use gwadm::configuration::Configuration;
use gwadm::exit_codes::GwadmExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::execute_command;

/// Main entry point for the program
#[tokio::main]
async fn main() {
    // Initialize the logging subsystem
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Get the configuration
    let configuration = match Configuration::load_or_create_default() {
        Ok(configuration) => configuration,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(GwadmExitCode::ConfigError.code());
        }
    };

    // Parse and execute the CLI command
    if let Err(e) = execute_command(configuration).await {
        eprintln!("ERROR: {}", e);
        std::process::exit(e.exit_code());
    }
}
