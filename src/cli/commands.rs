//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Browse a paginated JSON:API collection
#[derive(Parser, Debug)]
#[command(name = "jsonapi-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Service base URL (overrides the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Collection path relative to the base URL
    #[arg(short, long, global = true, default_value = "images")]
    pub path: String,

    /// Extra query parameter (key=value, repeatable)
    #[arg(long = "param", global = true, value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Filter (field[__lookup]=value, repeatable)
    #[arg(long = "filter", global = true, value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,

    /// Items per page request (1-50)
    #[arg(long, global = true)]
    pub page_size: Option<usize>,

    /// Bearer token
    #[arg(long, global = true, env = "JSONAPI_PAGER_TOKEN")]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the item at an index
    Get {
        /// Zero-based position
        index: usize,
    },

    /// Print the items in [start, stop)
    Slice {
        start: usize,
        stop: usize,

        /// Take every n-th item
        #[arg(long, default_value = "1")]
        step: usize,
    },

    /// Print the total number of items
    Count,

    /// Walk the collection from index 0
    Iterate {
        /// Stop after this many items (default: the whole collection)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print one resource
    Resource {
        /// Resource type (image, user, artist, character, ...)
        kind: String,
        id: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Indented JSON
    Pretty,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}

#[cfg(test)]
mod command_tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_slice_with_params() {
        let cli = Cli::try_parse_from([
            "jsonapi-pager",
            "--param",
            "sort=-id",
            "--filter",
            "age_rating__iexact=sfw",
            "slice",
            "2",
            "5",
            "--step",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.params, vec![("sort".to_string(), "-id".to_string())]);
        assert_eq!(cli.filters[0].0, "age_rating__iexact");
        assert_eq!(cli.path, "images");
        assert!(matches!(
            cli.command,
            Commands::Slice {
                start: 2,
                stop: 5,
                step: 2
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_param() {
        let result = Cli::try_parse_from(["jsonapi-pager", "--param", "oops", "count"]);
        assert!(result.is_err());
    }
}
