//! askdata - Main CLI Entry Point

use anyhow::{anyhow, Context, Result};
use askdata::cli::{render_object, Args, Commands, ConfigCommand, QueryArgs, Verbosity};
use askdata::client::{ClientOptions, QueryClient};
use askdata::config::Config;
use askdata::types::Parsed;
use clap::Parser;
use colored::Colorize;
use futures_util::StreamExt;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbosity());

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let config = Config::load_from(&config_path)?;

    match &args.command {
        Commands::Config { action } => run_config(action, config, &config_path),
        Commands::Retrieve(query) => {
            let client = build_client(&args, &config)?;
            run_retrieve(&client, query).await
        }
        Commands::Stream { query, strict } => {
            let client = build_client(&args, &config)?;
            run_stream(&client, query, *strict).await
        }
    }
}

/// Install the log subscriber; RUST_LOG overrides the verbosity flags
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Flags, then environment, then config file, then defaults
fn build_client(args: &Args, config: &Config) -> Result<QueryClient> {
    let mut flags = ClientOptions::new().timeout(config.timeout);
    flags.api_key = args.api_key.clone();
    flags.base_url = args.base_url.clone();
    if let Some(read_ms) = args.timeout_ms {
        flags = flags.read_timeout_ms(read_ms);
    }

    let options = flags
        .or_layer(ClientOptions::from_env())
        .or_layer(config.to_options());

    QueryClient::new(options).context("Failed to create client")
}

async fn run_retrieve(client: &QueryClient, query: &QueryArgs) -> Result<()> {
    let request = query.to_request().map_err(|e| anyhow!(e))?;
    let parsed = client.retrieve(&request).await?;

    if query.json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
    }

    print_parsed(parsed)
}

async fn run_stream(client: &QueryClient, query: &QueryArgs, strict: bool) -> Result<()> {
    let request = query.to_request().map_err(|e| anyhow!(e))?;
    let mut events = if strict {
        client.stream_strict(&request).await?
    } else {
        client.stream(&request).await?
    };

    while let Some(event) = events.next().await {
        let event = match event {
            Ok(event) => event,
            Err(err @ askdata::ClientError::MalformedLine { .. }) => {
                eprintln!("{} {}", "✗".red(), err);
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        if query.json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            print_parsed(event)?;
        }
    }

    if events.dropped_lines() > 0 && !strict {
        eprintln!(
            "{}",
            format!("{} malformed line(s) skipped", events.dropped_lines()).yellow()
        );
    }

    Ok(())
}

fn print_parsed(parsed: Parsed) -> Result<()> {
    match parsed {
        Parsed::Object(tagged) => {
            let kind = tagged.kind();
            match tagged.to_typed() {
                Ok(obj) => println!("{}", render_object(&obj)),
                Err(err) => {
                    tracing::warn!(kind = %kind, error = %err, "unexpected object shape");
                    println!("{}", serde_json::to_string_pretty(&tagged)?);
                }
            }
        }
        Parsed::List(items) => {
            for item in items {
                print_parsed(item)?;
            }
        }
        Parsed::Primitive(value) => println!("{}", value),
        Parsed::Null => println!("{}", "(empty response)".dimmed()),
    }
    Ok(())
}

fn run_config(action: &ConfigCommand, mut config: Config, path: &Path) -> Result<()> {
    match action {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            if shown.api.api_key.is_some() {
                shown.api.api_key = Some("<redacted>".to_string());
            }
            println!("{}", toml::to_string_pretty(&shown)?);
        }
        ConfigCommand::Path => println!("{}", path.display()),
        ConfigCommand::SetKey { key } => {
            config.set_api_key(key.clone());
            config.save_to(path)?;
            println!("{} API key saved to {}", "✓".green(), path.display());
        }
        ConfigCommand::SetUrl { url } => {
            config.set_base_url(url.clone());
            config.save_to(path)?;
            println!("{} Base URL saved to {}", "✓".green(), path.display());
        }
        ConfigCommand::SetTimeout { read_ms } => {
            config.set_read_timeout_ms(*read_ms);
            config.save_to(path)?;
            println!("{} Read timeout saved to {}", "✓".green(), path.display());
        }
    }
    Ok(())
}
