//! yt2mp3-core: download-and-tag pipeline for YouTube audio

pub mod config;
pub mod downloader;
pub mod error;
pub mod events;
pub mod pool;
pub mod queue;
pub mod search;
pub mod tagger;
pub mod urls;
pub mod validate;

pub use config::Config;
pub use error::{Result, Yt2Mp3Error};
