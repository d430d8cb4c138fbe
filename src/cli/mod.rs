use clap::{Parser, Subcommand};
use tracing::Level;

use crate::proto::Method;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub subcommand: Runtime,

    #[clap(short, long, default_value_t = ("0.0.0.0:8080").to_string(), global = true)]
    pub addr: String,

    #[arg(long, default_value_t = Level::INFO, global = true)]
    pub log_level: Level,
}

#[derive(Debug, Subcommand)]
pub enum Runtime {
    /// Serve requests until interrupted.
    Server {
        /// Seconds open connections get to finish once shutdown starts.
        #[arg(long, default_value_t = 5)]
        shutdown_timeout: u64,
    },
    /// Send a single request and print the reply.
    Client {
        method: Method,
        path: String,
        #[arg(long)]
        body: Option<String>,
    },
}
