use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use colored::Colorize;
use resumable_upload::{Client, ClientConfig, ProgressEvent, ProgressReporter};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "resumable-upload",
    version,
    about = "Resumable Upload\n----------------\nUploads a file in chunks to a resumable.js endpoint",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload file to remote server
    Upload {
        /// Authorization for remote server URL
        apikey: String,
        /// Remote server URL for upload
        url: String,
        /// File to upload
        file: PathBuf,
        /// Timeout for each request in milliseconds (none by default)
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Timeout for establishing connections in milliseconds (none by default)
        #[arg(long)]
        connect_timeout_ms: Option<u64>,
        /// Extra words after the file are accepted and ignored
        #[arg(hide = true)]
        ignored: Vec<String>,
    },
}

/// Prints progress lines in green on stdout
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn report(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::ChunkExists { .. } | ProgressEvent::ChunkUploading { .. } => {
                println!("{}", event.to_string().green());
            }
            ProgressEvent::Completed {
                response: Some(response),
            } => {
                println!("Result:");
                println!("{}", response.green());
            }
            other => debug!("{}", other),
        }
    }
}

/// Lowercases the command word so `UPLOAD` and `Upload` are accepted
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| match arg.to_str() {
            Some(word) if i == 1 && word.eq_ignore_ascii_case("upload") => OsString::from("upload"),
            _ => arg,
        })
        .collect()
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let Command::Upload {
        apikey,
        url,
        file,
        timeout_ms,
        connect_timeout_ms,
        ..
    } = cli.command;

    let mut config = ClientConfig::new();
    if let Some(ms) = timeout_ms {
        config = config.with_request_timeout(ms);
    }
    if let Some(ms) = connect_timeout_ms {
        config = config.with_connect_timeout(ms);
    }

    let result = match Client::new(config) {
        Ok(client) => {
            client
                .upload_with_reporter(&apikey, &url, &file, &ConsoleReporter)
                .await
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(summary) => {
            debug!(?summary, "upload finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", format!("Error: {}", err).red());
            ExitCode::FAILURE
        }
    }
}
