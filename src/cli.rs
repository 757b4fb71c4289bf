//! CLI argument parsing for the avsar-worker binary.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "avsar-worker", about = "Avsar opportunities portal backend worker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker server (default if no subcommand given)
    Serve,
    /// Run database migrations and exit
    Migrate,
    /// Print the import template CSV for an entity type to stdout
    Template {
        /// Entity type: opportunities, schools or organizers
        entity: String,
    },
}
