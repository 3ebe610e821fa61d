//! Command-line interface for HealthFinder.

mod commands;

use clap::{Parser, Subcommand};

/// HealthFinder - find nearby hospitals, pharmacies and clinics
#[derive(Parser)]
#[command(name = "healthfinder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the facility directory HTTP API
    #[command(alias = "daemon", alias = "-d")]
    Serve,

    /// Search facilities once through the configured provider
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,

        /// Bias results around "lat,lng"
        #[arg(long)]
        location: Option<String>,
    },

    /// Show recent search history from a running server
    #[command(alias = "h")]
    History {
        /// Only entries for this user
        #[arg(long)]
        user: Option<String>,

        /// Server base URL (defaults to [interface] api_base_url)
        #[arg(long)]
        api: Option<String>,
    },

    /// Interactive search box against a running server
    #[command(alias = "f")]
    Find {
        /// Server base URL (defaults to [interface] api_base_url)
        #[arg(long)]
        api: Option<String>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
