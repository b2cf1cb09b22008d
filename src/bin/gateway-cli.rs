use std::path::PathBuf;
use std::sync::Arc;

use axum::http::Method;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use v2_gateway::config::load_config;
use v2_gateway::dispatch::{EchoHandler, Gateway, InboundRequest};
use v2_gateway::build_registry;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Offline tooling for the v2 API gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the v1 parameters a v2 request translates into
    Translate {
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request path without the API base path, e.g. /collections/c1/shards
        #[arg(short, long)]
        path: String,

        /// Query parameter as key=value; may repeat
        #[arg(short, long, value_parser = parse_key_value)]
        query: Vec<(String, String)>,

        /// JSON request body
        #[arg(short, long, conflicts_with = "body_file")]
        body: Option<String>,

        /// File holding the JSON request body
        #[arg(long)]
        body_file: Option<PathBuf>,
    },
    /// List registered endpoints
    Routes,
    /// Load and validate a configuration file
    CheckConfig { file: PathBuf },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let gateway = Gateway::new(build_registry(Arc::new(EchoHandler))?);

    match cli.command {
        Commands::Translate {
            method,
            path,
            query,
            body,
            body_file,
        } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())?;
            let mut request = InboundRequest::new(method, path);
            request.query = query;
            request.body = match (body, body_file) {
                (Some(body), _) => Some(body.into()),
                (None, Some(file)) => Some(std::fs::read(file)?.into()),
                (None, None) => None,
            };

            let translation = gateway.translate(&request)?;
            let requests: Vec<Value> = translation
                .requests
                .iter()
                .map(|r| json!({ "method": r.method.as_str(), "params": r.params }))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "endpoint": translation.endpoint.name(),
                    "requests": requests,
                }))?
            );
        }
        Commands::Routes => {
            println!("{:<8} {:<52} {}", "METHOD", "TEMPLATE", "COMMANDS");
            for endpoint in gateway.registry().endpoints() {
                let commands = match endpoint.schema() {
                    Some(schema) => schema.command_names().collect::<Vec<_>>().join(", "),
                    None => endpoint
                        .constants()
                        .iter()
                        .map(|(k, v)| format!("{}={}", k, v))
                        .collect::<Vec<_>>()
                        .join(", "),
                };
                println!(
                    "{:<8} {:<52} {}",
                    endpoint.method().as_str(),
                    endpoint.template().as_str(),
                    commands
                );
            }
        }
        Commands::CheckConfig { file } => {
            let config = load_config(&file)?;
            println!("{} is valid", file.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
