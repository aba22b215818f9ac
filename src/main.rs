//! Prototype language server for the policy rule language.
//!
//! Serves LSP over stdio by default, or over TCP with `--listen`. Document
//! sync is full-text only; completion offers `input.` field names drawn
//! from a sample input JSON file; formatting normalizes sentence
//! capitalization line by line from the on-disk file content.

mod backend;
mod completion;
mod config;
mod formatter;
mod snapshot;
mod text;
mod token;

use backend::Backend;
use clap::Parser;
use config::ServerConfig;
use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tower_lsp::{LspService, Server};

#[derive(Debug, Parser)]
#[command(name = "policy-lsp", version, about = "Start the policy language server")]
struct Args {
    /// Serve over TCP on this address instead of stdio.
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Flat JSON object used as the completion data source.
    #[arg(long, default_value = "input.json")]
    input_file: PathBuf,

    /// Append logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Establishes the log destination. Failure to open the requested file is
/// fatal before any request is served.
fn init_logging(log_file: Option<&Path>) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file {
        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => file,
            Err(err) => {
                eprintln!("policy-lsp: cannot open log file {}: {err}", path.display());
                std::process::exit(1);
            }
        };
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.log_file.as_deref());

    let config = ServerConfig {
        input_file: args.input_file,
    };

    match args.listen {
        Some(addr) => serve_tcp(addr, config).await,
        None => serve_stdio(config).await,
    }
}

async fn serve_stdio(config: ServerConfig) {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| Backend::new(client, config));
    Server::new(stdin, stdout, socket).serve(service).await;
}

async fn serve_tcp(addr: SocketAddr, config: ServerConfig) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("policy-lsp: cannot bind {addr}: {err}");
            std::process::exit(1);
        }
    };
    log::info!("listening on {addr}");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                log::warn!("accept failed: {err}");
                continue;
            }
        };
        log::info!("editor connected from {peer}");

        let config = config.clone();
        let (read, write) = tokio::io::split(stream);
        let (service, socket) = LspService::new(move |client| Backend::new(client, config));
        tokio::spawn(async move {
            Server::new(read, write, socket).serve(service).await;
        });
    }
}
