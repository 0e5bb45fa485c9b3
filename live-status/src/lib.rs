//! Polls a YouTube channel and serves a single summary of it over HTTP.
//!
//! A [`refresher::Refresher`] periodically lists the channel's recent videos, picks either the
//! live broadcast or the newest video ([`resolver`]), looks up when that video's broadcast
//! ended ([`enricher`]), and commits the result to a [`state::StateStore`]. The
//! [`server`] hands that record to any client as JSON, so a static web page can show whether
//! the channel is live without shipping an API key or spending quota per visitor.

pub mod config;
pub mod enricher;
pub mod provider;
pub mod refresher;
pub mod resolver;
pub mod server;
pub mod state;
pub mod youtube_api;

pub use config::Config;
pub use refresher::Refresher;
pub use state::{ResolvedState, StateStore};
pub use youtube_api::YouTubeClient;
