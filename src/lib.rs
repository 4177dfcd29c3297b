//! ShowScout - Search a TV show catalog and browse episode lists
//!
//! This library provides the catalog client, the view state that holds what
//! is displayed, and the browser controller that ties user actions to both.
//!
//! Data flows in one direction for both pipelines: a user action triggers a
//! fetch, the response is normalized into [`ShowSummary`] or
//! [`EpisodeSummary`] records, and the records replace the matching area of
//! the [`BrowserState`]. Rendering is a pure projection of that state.

mod browser;
mod catalog;
mod view;

use std::io;
use thiserror::Error;

// Re-export catalog types
pub use catalog::{
    CatalogError, DEFAULT_BASE_URL, EpisodeSummary, PLACEHOLDER_IMAGE, ShowCatalog, ShowId,
    ShowSummary, TvMazeCatalog, image_or_placeholder,
};

// Re-export view and controller types
pub use browser::{Browser, EpisodesOutcome, EpisodesTicket, SearchOutcome, SearchTicket};
pub use view::{BrowserState, EpisodeCard, Mode, Notice, Screen, ShowCard, render};

/// Top-level error type for ShowScout operations
#[derive(Debug, Error)]
pub enum ShowScoutError {
    /// Error while talking to the catalog
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error while prompting the user
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Error while writing JSON output
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
