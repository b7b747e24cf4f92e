use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "jobcast", version, about = "Scrape job boards and compose job alerts")]
pub struct Cli {
    /// RON config file (defaults to ./jobcast.ron when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the registered categories and their sources
    Sources,
    /// Fetch and print current jobs for a category
    Fetch {
        category: String,
        /// Print jobs as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compose an alert for a recipient and hand it to the console channel
    Send {
        #[arg(long)]
        name: String,
        /// Recipient address, e.g. whatsapp:+14155550100
        #[arg(long)]
        address: String,
        #[arg(long)]
        category: String,
    },
}
