//! telegrab - scraping public Telegram channels through the web preview.
//!
//! The crate turns a channel reference into an ordered batch of post
//! records by paginating backward through the `t.me/s/` preview feed, and
//! offers the supporting pieces a delivery pipeline needs: a content
//! chunker for platform message-size ceilings, a summary renderer, an LLM
//! rewrite client, and a CDN media downloader.

pub mod chunk;
pub mod cli;
pub mod config;
pub mod llm;
pub mod media;
pub mod models;
pub mod render;
pub mod scrape;
pub mod server;
