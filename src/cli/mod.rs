//! CLI module
//!
//! Command-line interface for browsing a paginated collection.
//!
//! # Commands
//!
//! - `get` - Print the item at an index
//! - `slice` - Print a range of items
//! - `count` - Print the total number of items
//! - `iterate` - Walk the collection from the start
//! - `resource` - Print a single resource by kind and id

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
