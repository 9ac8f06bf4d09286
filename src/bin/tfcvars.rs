//! Terraform Cloud variables CLI binary.
//!
//! Reads a workspace's variables or loads a document of variables into one.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tfcvars::cli::{Cli, Command, OutputFormat};
use tfcvars::{
    output, parse_type_declaration, Fetch, PrettyPrint, TfcClient, TfcError, TokenResolver,
    VariableSet, DEFAULT_ADDRESS,
};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let Some(command) = cli.command.as_ref() else {
        return usage();
    };

    let Some(workspace) = command.workspace() else {
        tracing::info!("workspace required");
        return usage();
    };

    let client = match build_client(&cli) {
        Ok(c) => c,
        Err(TfcError::ConfigMissing(reason)) => {
            tracing::info!("token required: {reason}");
            return usage();
        }
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, command, workspace).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            if matches!(e, TfcError::InvalidValue { .. }) {
                eprintln!("Hint: the value does not match the kind given with --type");
            }
            ExitCode::FAILURE
        }
    }
}

/// Print usage and exit successfully, as for a missing workspace or token.
fn usage() -> ExitCode {
    let _ = Cli::command().print_help();
    ExitCode::SUCCESS
}

fn build_client(cli: &Cli) -> tfcvars::Result<TfcClient> {
    let host = url::Url::parse(&cli.address)?
        .host_str()
        .unwrap_or(tfcvars::credentials::DEFAULT_HOST)
        .to_string();

    let token = TokenResolver::new(host)
        .with_explicit(cli.token.clone())
        .resolve()?;

    if cli.address != DEFAULT_ADDRESS {
        tracing::debug!(address = %cli.address, "using custom address");
    }

    TfcClient::new(&token, &cli.address)
}

async fn run(client: &TfcClient, command: &Command, workspace: &str) -> tfcvars::Result<()> {
    match command {
        Command::Read {
            format,
            compact,
            types,
            ..
        } => handle_read(client, workspace, *format, !compact, types).await,
        Command::Load { file, .. } => {
            let variables = match file {
                Some(path) => VariableSet::from_path(path)?,
                None => VariableSet::from_reader(std::io::stdin().lock())?,
            };
            handle_load(client, workspace, &variables).await;
            Ok(())
        }
    }
}

async fn handle_read(
    client: &TfcClient,
    workspace: &str,
    format: OutputFormat,
    pretty: bool,
    types: &[String],
) -> tfcvars::Result<()> {
    let mut variables = VariableSet::fetch(client, workspace.to_string()).await?;

    for declaration in types {
        let (key, kind) = parse_type_declaration(declaration)?;
        if variables.declare_type(&key, kind) == 0 {
            tracing::warn!(key = %key, "no variable with this key; type ignored");
        }
    }

    println!("{}", output::render(&variables, format, pretty)?);
    Ok(())
}

async fn handle_load(client: &TfcClient, workspace: &str, variables: &VariableSet) {
    tracing::info!(count = variables.len(), "loading into workspace {workspace}");
    let report = variables.publish(client, workspace).await;
    eprintln!("{}", report.pretty_print());
}
