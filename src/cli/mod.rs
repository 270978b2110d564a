pub mod commands;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "eksirss")]
#[command(about = "Ekşi Sözlük entry pages as RSS feeds", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/eksirss/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve feeds over HTTP
    Serve {
        /// Address to listen on (overrides [server] bind)
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// Print the RSS feed for a term
    Feed {
        /// Search term, e.g. "haci murat"
        term: String,
    },
    /// Show what is cached for a term
    Inspect {
        /// Search term, e.g. "haci murat"
        term: String,
    },
}
