mod cli;
mod commands;
mod observability;
mod output;
mod settings;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use medview_core::{OrdsClient, Viewer};
use output::{print_error, print_warning};

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional; anything other than a missing file is worth a warning
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        print_warning(&format!("Failed to load .env file: {e}"));
    }

    let cli = Cli::parse();
    observability::init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let endpoint = match settings::resolve_endpoint(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            print_error(&e.user_message());
            return Ok(ExitCode::from(2));
        }
    };
    tracing::debug!(endpoint = %endpoint.endpoint(), "Configuration loaded");

    match &cli.command {
        Commands::Config => {
            commands::info::config(&endpoint);
            Ok(ExitCode::SUCCESS)
        }
        Commands::About => {
            commands::info::about(&endpoint);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Fetch(args) => {
            let viewer = make_viewer(&cli, endpoint)?;
            let format = cli.format.unwrap_or_default();
            commands::fetch::fetch(&viewer, &args.patient_id, format).await
        }
        Commands::Shell => {
            let viewer = make_viewer(&cli, endpoint)?;
            commands::shell::shell(&viewer).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn make_viewer(cli: &Cli, endpoint: medview_core::EndpointConfig) -> Result<Viewer<OrdsClient>> {
    let client = OrdsClient::new(endpoint)?;
    Ok(Viewer::new(client)
        .with_id_policy(settings::id_policy(cli))
        .with_options(settings::normalize_options(cli)))
}
