//! Command-line front end for the shoebox viewer engine.

use clap::{Parser, Subcommand};
use miette::Result;
use shoebox_archive::LocalStore;
use shoebox_config::Config;
use shoebox_session::{Scheduler, Session, SourceState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "shoebox", version, about = "Local viewer engine for archived social-media export bundles")]
struct Cli {
    /// Archive root directory; overrides the configured default.
    #[arg(long, global = true)]
    archive: Option<PathBuf>,
    /// Explicit config file path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the blogs discovered in the archive's index.
    Blogs,
    /// Load one blog and print its sources report and posts.
    Show {
        /// Blog name, as listed by `blogs`.
        name: String,
        /// Print at most this many posts.
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(Some(path)),
        None => Config::load(),
    }
    .map_err(miette::Report::msg)?;
    let root = config
        .resolve_archive_root(cli.archive.as_deref())
        .map_err(miette::Report::msg)?;
    let store = LocalStore::open(&root)
        .map_err(miette::Report::msg)?;

    let scheduler = Scheduler::with_budget(Duration::from_millis(config.slice_budget_ms));
    let session = Session::with_scheduler(Arc::new(store), scheduler)
        .with_online_fallback(config.fallback_to_online_media);

    match cli.command {
        Command::Blogs => list_blogs(&session).await,
        Command::Show { name, limit } => show_blog(&session, &name, limit).await,
    }
}

async fn list_blogs(session: &Session) -> Result<()> {
    let blogs = session
        .blogs()
        .await
        .map_err(miette::Report::msg)?;
    if blogs.is_empty() {
        println!("no blogs found in the archive index");
        return Ok(());
    }
    for blog in blogs {
        let metadata = &blog.metadata;
        let posts = metadata.posts.map_or_else(String::new, |n| format!(", {n} posts"));
        println!("{} ({}{posts})", metadata.name, metadata.platform());
    }
    Ok(())
}

async fn show_blog(session: &Session, name: &str, limit: usize) -> Result<()> {
    let blogs = session
        .blogs()
        .await
        .map_err(miette::Report::msg)?;
    let Some(blog) = blogs.iter().find(|blog| blog.metadata.name == name) else {
        return Err(miette::miette!("no blog named `{name}` in the archive index"));
    };
    let Some(loaded) = session
        .load_blog(blog)
        .await
        .map_err(miette::Report::msg)?
    else {
        return Err(miette::miette!("loading `{name}` was aborted"));
    };

    println!("{name}:");
    for (source, state) in loaded.sources().iter() {
        let state = match state {
            SourceState::Missing => "missing".to_string(),
            SourceState::Empty => "empty".to_string(),
            SourceState::Loaded(count) => format!("{count} records"),
        };
        println!("  {source}: {state}");
    }

    println!();
    for pair in loaded.posts().iter().take(limit) {
        let post = &pair.post;
        let when = post.created_at.map_or_else(|| "undated".to_string(), |at| at.to_string());
        let excerpt: String = post.body.content.chars().take(72).collect();
        println!("[{}] {} {}", post.kind, when, excerpt);
    }
    let remaining = loaded.posts().len().saturating_sub(limit);
    if remaining > 0 {
        println!("... and {remaining} more");
    }
    Ok(())
}
