//! CLI entry point for mdxgen

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mdxgen")]
#[command(version)]
#[command(about = "Static blog pipeline for MDX content", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline and generate the feeds
    #[command(alias = "b")]
    Build,

    /// Build, then serve the markdown API and static files
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List posts in the content directory
    List,

    /// Remove generated feeds and the placeholder cache
    Clean,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdxgen=debug,info"
    } else {
        "mdxgen=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let site = mdxgen::Site::new(&base_dir)?;

    match cli.command {
        Commands::Build => {
            tracing::info!("Building feeds...");
            site.build()?;
            println!("Built successfully!");
        }

        Commands::Serve { port, ip } => {
            tracing::info!("Building feeds...");
            site.build()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            mdxgen::server::start(&site, &ip, port).await?;
        }

        Commands::List => {
            mdxgen::commands::list::run(&site)?;
        }

        Commands::Clean => {
            site.clean()?;
            println!("Cleaned successfully!");
        }
    }

    Ok(())
}
