use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use factcache::{
    cli::{Args, Runtime},
    client, server,
    storage::storage::Storage,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    match args.subcommand {
        Runtime::Server { shutdown_timeout } => {
            let storage = Storage::new();
            let server = server::Server::bind(&args.addr, storage)
                .await
                .with_context(|| format!("could not listen on {}", args.addr))?
                .with_shutdown_timeout(Duration::from_secs(shutdown_timeout));

            server
                .serve(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        error!(error = %e, "failed to listen for interrupt");
                    }
                })
                .await?;
        }
        Runtime::Client { method, path, body } => {
            let c = client::Client::connect(&args.addr)
                .await
                .with_context(|| format!("could not connect to {}", args.addr))?;

            let reply = c.request(method, &path, body).await?;
            info!(status = reply.status, "reply received");
            println!("{}", reply.body);
        }
    }

    Ok(())
}
