//! CLI entry point for blog-index

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blog-index")]
#[command(version)]
#[command(about = "A personal blog generator with a filterable post index", long_about = None)]
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
    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// File name for the new post, relative to _posts
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Disable file watching and live reload
        #[arg(long)]
        r#static: bool,
    },

    /// Delete the public folder
    Clean,

    /// List posts as the index shows them, or tags
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,

        /// List posts with drafts switched on
        #[arg(long)]
        drafts: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "blog_index=debug,info"
    } else {
        "blog_index=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::New { title, path } => {
            let blog = blog_index::Blog::new(&base_dir)?;
            tracing::info!("Creating new post: {}", title);
            let created = blog_index::commands::new::create_post(&blog, &title, path.as_deref())?;
            println!("Created: {}", created.display());
        }

        Commands::Generate { watch } => {
            let blog = blog_index::Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");
            blog.generate()?;
            println!("Generated successfully!");

            if watch {
                tokio::task::spawn_blocking(move || blog_index::commands::generate::watch(&blog))
                    .await??;
            }
        }

        Commands::Server { port, ip, r#static } => {
            let blog = blog_index::Blog::new(&base_dir)?;

            tracing::info!("Generating static files...");
            blog.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            blog_index::server::start(&blog, &ip, port, !r#static).await?;
        }

        Commands::Clean => {
            let blog = blog_index::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type, drafts } => {
            let blog = blog_index::Blog::new(&base_dir)?;
            blog_index::commands::list::run(&blog, &r#type, drafts)?;
        }

        Commands::Version => {
            println!("blog-index version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
