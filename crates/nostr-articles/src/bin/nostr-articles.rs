use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use nostr_articles::{
    ArticleConfig, ArticleProjection, ArticlePublisher, CancellationToken,
    IdentityProvider, PublishArticleInput, RelayExecutor,
};

#[derive(Debug, Parser)]
#[command(name = "nostr-articles")]
#[command(about = "List, read and publish long-form articles on Nostr relays")]
struct Args {
    /// Relay URL(s). Falls back to NOSTR_RELAYS env.
    #[arg(long, global = true)]
    relay: Vec<String>,

    /// Secret key (hex or nsec). Falls back to NOSTR_SECRET_KEY env.
    #[arg(long, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List articles, newest first
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Print one article by slug
    Get { slug: String },
    /// Publish an article from a markdown file
    Publish {
        #[arg(long)]
        slug: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        summary: String,
        /// Markdown body
        #[arg(long)]
        content: PathBuf,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        image_alt: Option<String>,
        /// Repeat for several categories
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Show the signer key and whether it may publish
    Whoami,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nostr_articles=info".parse()?),
        )
        .init();
    let args = Args::parse();

    let mut config = ArticleConfig::from_env_with_relays(args.relay)?;
    if let Some(key) = args.key {
        config.relay.secret_key = Some(key);
    }
    info!(relays = ?config.relay.relays, "Connecting to relays");

    let relay = Arc::new(RelayExecutor::new(config.relay.clone()).await?);
    let projection = ArticleProjection::new(relay.clone(), config.publishers.clone())
        .with_kind(config.kind)
        .with_timeout(config.relay.query_timeout);
    let publisher = ArticlePublisher::new(relay.clone(), relay.clone(), config.publishers.clone())
        .with_kind(config.kind);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            on_interrupt.cancel();
        }
    });

    match args.command {
        Command::List { category } => {
            let articles = projection.list_articles(category.as_deref(), &cancel).await?;
            println!("{}", serde_json::to_string_pretty(&articles)?);
        }
        Command::Get { slug } => match projection.get_article(&slug, &cancel).await? {
            Some(article) => println!("{}", serde_json::to_string_pretty(&article)?),
            None => {
                relay.disconnect().await;
                return Err(format!("article not found: {slug}").into());
            }
        },
        Command::Publish {
            slug,
            title,
            summary,
            content,
            image,
            image_alt,
            categories,
        } => {
            let input = PublishArticleInput {
                slug,
                title,
                summary,
                content: std::fs::read_to_string(&content)?,
                image,
                image_alt,
                categories,
            };
            let result = publisher.publish(input).await?;
            println!("{}", result.event_id);
        }
        Command::Whoami => {
            match relay.current_user() {
                Some(user) => println!("{}", user.pubkey),
                None => println!("(no key)"),
            }
            println!("authorized: {}", publisher.is_authorized());
        }
    }

    relay.disconnect().await;
    Ok(())
}
