/// Data structures and traits for TV show catalog lookups.
///
/// This module provides the normalized display records for shows and
/// episodes, the error type shared by all catalog operations, and the
/// trait that catalog backends implement.
mod tvmaze;
mod tvmaze_types;

pub use tvmaze::{DEFAULT_BASE_URL, TvMazeCatalog};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// Image shown for shows and episodes that the catalog has no image for.
pub const PLACEHOLDER_IMAGE: &str = "https://tinyurl.com/tv-missing";

/// Errors that can occur while fetching from the catalog.
///
/// Every variant means "fetch failed" to the user. The variants only exist
/// so callers and logs can tell the causes apart.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    Request(String),

    /// The catalog answered with a non-success status
    #[error("HTTP {status} {reason}")]
    Status { status: u16, reason: String },

    /// The requested show does not exist in the catalog
    #[error("Show not found: {0}")]
    ShowNotFound(ShowId),

    /// The response body did not match the expected schema
    #[error("Malformed catalog response: {0}")]
    MalformedResponse(String),
}

/// Service-assigned identifier of a show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowId(pub u64);

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ShowId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ShowId)
    }
}

/// A show as returned by a catalog search, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSummary {
    /// Unique identifier assigned by the catalog
    pub id: ShowId,
    /// The show title
    pub name: String,
    /// Show description, possibly containing HTML markup
    pub summary: Option<String>,
    /// Image URL, or [`PLACEHOLDER_IMAGE`] when the catalog has none
    pub image: String,
}

/// A single episode of a show, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Identifier of the episode, unique within its show
    pub id: u64,
    /// The episode title
    pub name: String,
    /// Season number, starting at 1
    pub season: u32,
    /// Episode number within the season, starting at 1
    pub number: u32,
    /// Image URL, or [`PLACEHOLDER_IMAGE`] when the catalog has none
    pub image: String,
}

/// Picks the image to display for a catalog record.
///
/// Uses the URL of the "original" image variant verbatim when the record has
/// one and falls back to [`PLACEHOLDER_IMAGE`] otherwise.
pub fn image_or_placeholder(original: Option<String>) -> String {
    original.unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}

/// Trait for catalog services that can search shows and list episodes.
///
/// Implementors perform exactly one request per call and preserve the order
/// in which the service returned the records.
pub trait ShowCatalog {
    /// Searches the catalog for shows matching a free-text query.
    ///
    /// # Arguments
    ///
    /// * `query` - The search term. Callers reject blank queries beforehand.
    ///
    /// # Returns
    ///
    /// The matching shows in the order the catalog ranked them
    fn search_shows(&self, query: &str) -> Result<Vec<ShowSummary>, CatalogError>;

    /// Lists all episodes of a show.
    ///
    /// # Arguments
    ///
    /// * `show_id` - Identifier of a show previously returned by a search
    ///
    /// # Returns
    ///
    /// The episodes in the order the catalog returned them
    fn get_episodes(&self, show_id: ShowId) -> Result<Vec<EpisodeSummary>, CatalogError>;
}
