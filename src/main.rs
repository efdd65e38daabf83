use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use blog_api::client::{BlogClient, DEFAULT_BASE_URL};
use blog_api::config::Config;
use blog_api::server;
use blog_api::storage::{ArticleFilter, Database};
use blog_api::util::format_date_fr;

#[derive(Parser, Debug)]
#[command(name = "blog-api", about = "DevSecOps blog REST backend")]
struct Args {
    /// TOML config file (optional; PORT and DATABASE_URL override it)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Migrate, seed and serve the API (default)
    Serve {
        /// Override the listening port
        #[arg(long)]
        port: Option<u16>,

        /// Do not insert sample articles into an empty table
        #[arg(long)]
        no_seed: bool,
    },
    /// Create the schema and seed sample articles, then exit
    InitDb,
    /// Talk to a running server
    Client {
        /// API base URL
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        url: String,

        #[command(subcommand)]
        action: ClientAction,
    },
}

#[derive(Subcommand, Debug)]
enum ClientAction {
    /// List articles, optionally filtered
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one article
    Show { id: i64 },
    /// Like an article
    Like { id: i64 },
    /// List categories
    Categories,
    /// Show blog statistics
    Stats,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from '{}'", path.display()))?,
        None => Config::default(),
    };
    config
        .apply_env()
        .context("Invalid environment configuration")?;
    Ok(config)
}

/// Open the store and run the one-time seed before anything is served
async fn open_database(config: &Config, seed: bool) -> Result<Database> {
    tracing::info!(database = %config.redacted_database_url(), "Opening database");
    let db = Database::connect(&config.database_url, config.max_connections)
        .await
        .context("Failed to open database")?;

    if seed {
        let inserted = db.seed_if_empty().await.context("Failed to seed database")?;
        tracing::info!(inserted, "Database initialized");
    }
    Ok(db)
}

async fn run_client(url: &str, action: ClientAction) -> Result<()> {
    let client = BlogClient::new(url).context("Invalid API URL")?;

    match action {
        ClientAction::List { category, search } => {
            let filter = ArticleFilter::new(category.as_deref(), search.as_deref());
            let articles = client.articles(&filter).await?;
            for a in &articles {
                println!(
                    "#{:<3} {} [{}] par {}, {} min, {} likes, {}",
                    a.id,
                    a.title,
                    a.category,
                    a.author,
                    a.read_time,
                    a.likes,
                    format_date_fr(&a.created_at)
                );
            }
            println!("{} article(s)", articles.len());
        }
        ClientAction::Show { id } => {
            let a = client.article(id).await?;
            println!("{}\n{}\n", a.title, "=".repeat(a.title.chars().count()));
            println!("{} | {} | {}", a.author, a.category, format_date_fr(&a.created_at));
            println!("{}\n", a.content);
            println!("Tags: {}", a.tags.join(", "));
            println!("{} min de lecture, {} likes", a.read_time, a.likes);
        }
        ClientAction::Like { id } => {
            let likes = client.like(id).await?;
            println!("Article #{id}: {likes} likes");
        }
        ClientAction::Categories => {
            for category in client.categories().await? {
                println!("{category}");
            }
        }
        ClientAction::Stats => {
            let stats = client.stats().await?;
            println!("Articles: {}", stats.total_articles);
            println!("Likes: {}", stats.total_likes);
            println!("Catégories: {}", stats.categories);
            println!("Lecture moy.: {} min", stats.average_read_time);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Serve {
        port: None,
        no_seed: false,
    });

    match command {
        Command::Serve { port, no_seed } => {
            let mut config = load_config(args.config.as_ref())?;
            if let Some(port) = port {
                config.port = port;
            }
            tracing::debug!(config = ?config, "Effective configuration");

            let db = open_database(&config, config.seed && !no_seed).await?;
            server::serve(&config, db).await?;
        }
        Command::InitDb => {
            let config = load_config(args.config.as_ref())?;
            let db = open_database(&config, true).await?;
            db.close().await;
        }
        Command::Client { url, action } => run_client(&url, action).await?,
    }

    Ok(())
}
