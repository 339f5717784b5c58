mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "yt2mp3=info",
        1 => "yt2mp3=debug",
        2 => "yt2mp3=trace",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    // Ctrl-C kills the whole run immediately; in-flight downloads are not
    // drained.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted, exiting");
            std::process::exit(130);
        }
    });

    // Handle commands
    match cli.command {
        Some(Commands::Download { url, options }) => {
            commands::download::run(&url, &options, cli.config.as_deref()).await
        }
        Some(Commands::Batch {
            input,
            threads,
            options,
        }) => commands::batch::run(&input, threads, &options, cli.config.as_deref()).await,
        Some(Commands::Search {
            query,
            results,
            options,
        }) => commands::search::run(&query, results, &options, cli.config.as_deref()).await,
        Some(Commands::Doctor) => commands::doctor::run().await,
        Some(Commands::Config) => commands::config::run(cli.config.as_deref()).await,
        None => {
            // If URL provided directly, treat as download command
            if let Some(url) = cli.url {
                commands::download::run(&url, &cli.options, cli.config.as_deref()).await
            } else {
                // No URL, print help
                use clap::CommandFactory;
                Cli::command().print_help()?;
                println!();
                Ok(())
            }
        }
    }
}
