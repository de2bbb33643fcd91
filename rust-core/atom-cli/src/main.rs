// SPDX-License-Identifier: PMPL-1.0-or-later
//!
//! `atom`: command-line access to an AtoM server.
//!
//! Opens one session from flags or `ATOM_*` environment variables, runs a
//! single read command and prints the result as JSON or a table.

mod formatter;

use anyhow::{Context, Result};
use atom_client::{AtomClient, ClientConfig, Protocol};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use std::process::ExitCode;
use std::time::Duration;

use formatter::{format_value, OutputFormat};

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

/// Read ISAD(G) descriptions from an AtoM server.
#[derive(Parser, Debug)]
#[command(name = "atom", version = VERSION, about = "AtoM REST API client")]
struct Cli {
    /// Host of the AtoM server, optionally with port and path prefix.
    #[arg(long, env = "ATOM_SERVER")]
    server: String,

    /// URL scheme (http or https).
    #[arg(long, env = "ATOM_PROTOCOL", default_value = "https")]
    protocol: String,

    /// Username for Basic authentication.
    #[arg(long, env = "ATOM_USERNAME")]
    username: Option<String>,

    /// Password for Basic authentication.
    #[arg(long, env = "ATOM_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// REST API key, used when no username/password pair is given.
    #[arg(long, env = "ATOM_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Request timeout in seconds. Unset waits indefinitely.
    #[arg(long, env = "ATOM_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// ISO 639-1 culture for returned metadata.
    #[arg(long, global = true)]
    culture: Option<String>,

    /// Output format (json or table).
    #[arg(long, global = true, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the information-object collection.
    Search {
        /// Search text. Accepted for compatibility; the server returns the
        /// unfiltered collection.
        #[arg(default_value = "")]
        query: String,
    },
    /// Fetch one information object by slug.
    Get { slug: String },
    /// Find information objects by catalogue identifier.
    Identifier { identifier: String },
    /// Fetch the parent of the information object at a slug.
    Parent { slug: String },
}

impl Cli {
    fn config(&self) -> Result<ClientConfig> {
        let protocol: Protocol = self.protocol.parse()?;
        Ok(ClientConfig {
            server: self.server.clone(),
            protocol,
            username: self.username.clone(),
            password: self.password.clone(),
            api_key: self.api_key.clone(),
            timeout: self.timeout.map(Duration::from_secs),
        })
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(Some(value)) => {
            println!("{}", format_value(&value, cli.format));
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{} no result", "Error:".red().bold());
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Open the session and run the selected command.
fn run(cli: &Cli) -> Result<Option<Value>> {
    let config = cli.config()?;
    let client = AtomClient::connect(&config)
        .with_context(|| format!("could not open a session with {}", config.server))?;
    let culture = cli.culture.as_deref();

    let value = match &cli.command {
        Command::Search { query } => client.search(query, culture)?,
        Command::Get { slug } => client.get(slug, culture)?.map(Value::Object),
        Command::Identifier { identifier } => client.get_by_identifier(identifier, culture)?,
        Command::Parent { slug } => client.get_parent(slug, culture)?.map(Value::Object),
    };
    Ok(value)
}
