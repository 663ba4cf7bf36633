//! Signal harvesting for the food-trend pipeline.
//!
//! Each external source (YouTube, Reddit, TikTok, Google Trends, food-media
//! RSS, Instagram) is wrapped as a [`Harvester`]. [`collect_all`] runs them
//! concurrently behind a single barrier and merges whatever they return into
//! a [`foodtrend_core::Corpus`]. A failing source never aborts the others.

pub mod coordinator;
pub mod error;
pub mod extract;
pub mod harvester;

mod sources;

pub use coordinator::collect_all;
pub use error::SourceError;
pub use harvester::{HarvestFuture, Harvester};
pub use sources::{
    default_harvesters, GoogleTrendsHarvester, InstagramHarvester, RedditHarvester,
    RssFeedsHarvester, TiktokHarvester, YoutubeHarvester,
};
