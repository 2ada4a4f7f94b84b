//! Command-line argument parsing for askdata
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::client::QueryRequest;
use crate::types::JsonMap;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// askdata - ask natural-language questions of your data
#[derive(Parser, Debug)]
#[command(name = "askdata")]
#[command(version)]
#[command(about = "Query a hosted natural-language data service", long_about = None)]
pub struct Args {
    /// API key (falls back to ASKDATA_API_KEY, then the config file)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Service base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Read timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a structured query and print the result
    Retrieve(QueryArgs),

    /// Stream a natural-language answer
    Stream {
        #[command(flatten)]
        query: QueryArgs,

        /// Report malformed stream lines instead of skipping them
        #[arg(long)]
        strict: bool,
    },

    /// Inspect or edit the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

/// Arguments shared by query subcommands
#[derive(clap::Args, Debug, Clone)]
pub struct QueryArgs {
    /// Natural-language question
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Datafile to query (global target when omitted)
    #[arg(short, long)]
    pub datafile: Option<String>,

    /// Extra context as a JSON object, passed through verbatim
    #[arg(long, value_name = "JSON")]
    pub known_data: Option<String>,

    /// Print raw JSON instead of formatted output
    #[arg(long)]
    pub json: bool,
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Store an API key
    SetKey {
        key: String,
    },

    /// Store a base URL
    SetUrl {
        url: String,
    },

    /// Store a read timeout in milliseconds
    SetTimeout {
        read_ms: u64,
    },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl QueryArgs {
    /// Build the request, validating `--known-data`
    pub fn to_request(&self) -> Result<QueryRequest, String> {
        let mut request = QueryRequest::new(self.query.clone());

        if let Some(raw) = &self.known_data {
            let known: JsonMap = serde_json::from_str(raw)
                .map_err(|e| format!("--known-data must be a JSON object: {}", e))?;
            request = request.known_data(known);
        }

        if let Some(datafile) = &self.datafile {
            request = request.datafile(datafile.clone());
        }

        Ok(request)
    }
}

impl Verbosity {
    /// Default log filter when RUST_LOG is unset
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "askdata=debug,warn",
            Verbosity::VeryVerbose => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_args(known_data: Option<&str>) -> QueryArgs {
        QueryArgs {
            query: "How many users?".to_string(),
            datafile: Some("dfid".to_string()),
            known_data: known_data.map(str::to_string),
            json: false,
        }
    }

    #[test]
    fn test_parse_retrieve() {
        let args = Args::try_parse_from(["askdata", "retrieve", "How many users?", "-d", "dfid"])
            .unwrap();
        match args.command {
            Commands::Retrieve(query) => {
                assert_eq!(query.query, "How many users?");
                assert_eq!(query.datafile.as_deref(), Some("dfid"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_stream_with_globals() {
        let args = Args::try_parse_from([
            "askdata",
            "stream",
            "q",
            "--strict",
            "--api-key",
            "k",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.api_key.as_deref(), Some("k"));
        assert_eq!(args.verbosity(), Verbosity::VeryVerbose);
        assert!(matches!(args.command, Commands::Stream { strict: true, .. }));
    }

    #[test]
    fn test_parse_config_set_key() {
        let args = Args::try_parse_from(["askdata", "config", "set-key", "abc"]).unwrap();
        match args.command {
            Commands::Config {
                action: ConfigCommand::SetKey { key },
            } => assert_eq!(key, "abc"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_query_requires_text() {
        assert!(Args::try_parse_from(["askdata", "retrieve"]).is_err());
    }

    #[test]
    fn test_to_request() {
        let request = query_args(Some(r#"{"team": "growth"}"#)).to_request().unwrap();
        assert_eq!(request.datafile_id(), Some("dfid"));
        assert_eq!(request.known_data.unwrap()["team"], "growth");
    }

    #[test]
    fn test_to_request_rejects_non_object() {
        assert!(query_args(Some("[1, 2]")).to_request().is_err());
        assert!(query_args(Some("{oops")).to_request().is_err());
    }

    #[test]
    fn test_quiet_wins() {
        let args = Args::try_parse_from(["askdata", "-q", "-v", "config", "show"]).unwrap();
        assert_eq!(args.verbosity(), Verbosity::Quiet);
        assert_eq!(args.verbosity().log_filter(), "error");
    }
}
