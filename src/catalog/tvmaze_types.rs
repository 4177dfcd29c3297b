/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format of the search and
/// episode-list endpoints. Fields we do not display are ignored.
use serde::Deserialize;

/// One entry of the `/search/shows` response.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSearchResult {
    /// The matched show
    pub show: TvMazeShow,
}

/// A show record as embedded in a search result.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    pub id: u64,
    pub name: String,
    /// Show summary in HTML format (may be null)
    #[serde(default)]
    pub summary: Option<String>,
    /// Image links (null when the show has no artwork)
    #[serde(default)]
    pub image: Option<TvMazeImage>,
}

/// A single episode from the `/shows/{id}/episodes` response.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeEpisode {
    pub id: u64,
    /// Episode title (may be null for episodes without a title)
    #[serde(default)]
    pub name: Option<String>,
    /// Season number, validated to be at least 1 during normalization
    pub season: Option<u32>,
    /// Episode number within the season (null for specials)
    pub number: Option<u32>,
    #[serde(default)]
    pub image: Option<TvMazeImage>,
}

/// Image variants offered by TVMaze.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    #[serde(default)]
    pub original: Option<String>,
}
