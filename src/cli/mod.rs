//! CLI commands implementation.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;

use crate::chunk;
use crate::config::{load_settings, MediaSettings, Settings};
use crate::llm::LlmClient;
use crate::media;
use crate::models::Post;
use crate::render;
use crate::scrape::{parse_post_link, ChannelScraper};
use crate::server;

#[derive(Parser)]
#[command(name = "tgrab")]
#[command(about = "Telegram channel preview scraper and rewrite toolkit")]
#[command(version)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true, env = "TGRAB_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a channel's recent posts and print a summary
    Channel {
        /// Channel reference: @name, a t.me link, or a bare slug
        reference: String,
        /// Pages to fetch (1-20)
        #[arg(short, long)]
        pages: Option<usize>,
        /// Print the raw post batch as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Fetch one specific post by direct link
    Post {
        /// Direct post link: t.me/<channel>/<id> in any accepted form
        link: String,
        /// Print the post as JSON
        #[arg(long)]
        json: bool,
        /// Download the post's media into this directory
        #[arg(long, value_name = "DIR")]
        save_media: Option<PathBuf>,
    },

    /// Rewrite a post through the LLM and print delivery-sized segments
    Rewrite {
        /// Direct post link: t.me/<channel>/<id> in any accepted form
        link: String,
        /// Custom rewrite instruction
        #[arg(short, long)]
        instruction: Option<String>,
        /// Model identifier override
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Run the health endpoint server
    Serve {
        /// Port override
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Parse arguments, load settings, and dispatch.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Channel {
            reference,
            pages,
            json,
        } => channel_command(settings, reference, pages, json).await,
        Commands::Post {
            link,
            json,
            save_media,
        } => post_command(settings, link, json, save_media).await,
        Commands::Rewrite {
            link,
            instruction,
            model,
        } => rewrite_command(settings, link, instruction, model).await,
        Commands::Serve { port } => server::run(port.unwrap_or(settings.server.port)).await,
    }
}

async fn channel_command(
    settings: Settings,
    reference: String,
    pages: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let pages = pages.unwrap_or(settings.scrape.default_pages);
    let scraper = ChannelScraper::new(settings.scrape.clone());

    // The scrape is blocking and strictly sequential; run it off the
    // async runtime as one unit.
    let posts =
        tokio::task::spawn_blocking(move || scraper.fetch_posts(&reference, pages)).await??;

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
    } else {
        println!(
            "{}",
            render::format_summary(
                &posts,
                settings.limits.summary_posts,
                settings.limits.message_len
            )
        );
    }
    Ok(())
}

async fn post_command(
    settings: Settings,
    link: String,
    json: bool,
    save_media: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (slug, post_id) = parse_post_link(&link).ok_or_else(|| {
        anyhow::anyhow!("not a direct post link: {link:?} (expected t.me/<channel>/<id>)")
    })?;

    let scraper = ChannelScraper::new(settings.scrape.clone());
    let post = tokio::task::spawn_blocking(move || scraper.fetch_single_post(&slug, post_id))
        .await??;

    if let Some(dir) = save_media {
        save_post_media(&post, &dir, &settings.media).await?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&post)?);
    } else {
        print_post(&post);
    }
    Ok(())
}

fn print_post(post: &Post) {
    println!(
        "{} {} {}",
        post.media_type.emoji(),
        style(&post.post_link).bold(),
        if post.is_forwarded { "(forwarded)" } else { "" }
    );
    if let Some(posted_at) = post.posted_at {
        println!("  posted {} UTC", posted_at);
    }
    println!(
        "  {} views, {} forwards, media: {}",
        post.views,
        post.forwards,
        post.media_type.kind.as_str()
    );
    if let Some(url) = &post.photo_url {
        println!("  photo: {url}");
    }
    if let Some(url) = &post.video_url {
        println!("  video: {url}");
    }
    if !post.text.is_empty() {
        println!("\n{}", post.text);
    }
}

async fn save_post_media(
    post: &Post,
    dir: &Path,
    media_settings: &MediaSettings,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut saved = false;

    if let Some(url) = post.photo_url.clone() {
        let settings = media_settings.clone();
        let bytes =
            tokio::task::spawn_blocking(move || media::download_photo(&url, &settings)).await??;
        let path = dir.join("photo.jpg");
        std::fs::write(&path, bytes)?;
        println!("{} saved photo to {}", style("✓").green(), path.display());
        saved = true;
    }

    if let Some(url) = post.video_url.clone() {
        let settings = media_settings.clone();
        let bytes =
            tokio::task::spawn_blocking(move || media::download_video(&url, &settings)).await??;
        let path = dir.join("video.mp4");
        std::fs::write(&path, bytes)?;
        println!("{} saved video to {}", style("✓").green(), path.display());
        saved = true;
    }

    if !saved {
        println!("{} post has no downloadable media", style("!").yellow());
    }
    Ok(())
}

async fn rewrite_command(
    settings: Settings,
    link: String,
    instruction: Option<String>,
    model: Option<String>,
) -> anyhow::Result<()> {
    let (slug, post_id) = parse_post_link(&link).ok_or_else(|| {
        anyhow::anyhow!("not a direct post link: {link:?} (expected t.me/<channel>/<id>)")
    })?;

    let scraper = ChannelScraper::new(settings.scrape.clone());
    let post = tokio::task::spawn_blocking(move || scraper.fetch_single_post(&slug, post_id))
        .await??;

    let client = LlmClient::new(settings.llm.clone());
    let rewritten = match client
        .rewrite(&post, instruction.as_deref(), model.as_deref())
        .await
    {
        Ok(text) => text,
        // Fail soft at the delivery boundary: a visible error string
        // instead of an aborted command.
        Err(e) => format!("[rewrite failed: {e}]"),
    };

    let limits = &settings.limits;
    if post.has_media {
        // Peel a caption-sized head for the media message, then fit the
        // remainder to the plain-message ceiling.
        let (caption, rest) = chunk::split_once_at(&rewritten, limits.caption_len);
        println!("{}", style("— caption —").dim());
        println!("{caption}");
        for segment in chunk::split_all(&rest, limits.message_len) {
            println!("{}", style("— message —").dim());
            println!("{segment}");
        }
    } else {
        for segment in chunk::split_all(&rewritten, limits.message_len) {
            println!("{}", style("— message —").dim());
            println!("{segment}");
        }
    }
    Ok(())
}
