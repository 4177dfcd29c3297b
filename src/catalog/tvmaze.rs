/// TVMaze catalog implementation.
use super::tvmaze_types::{TvMazeEpisode, TvMazeSearchResult};
use super::{
    CatalogError, EpisodeSummary, ShowCatalog, ShowId, ShowSummary, image_or_placeholder,
};
use reqwest::StatusCode;
use reqwest::blocking::Response;
use serde::de::DeserializeOwned;

/// Default base URL of the public TVMaze API.
pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

/// Catalog backed by the TVMaze API.
///
/// Searches use the `/search/shows` endpoint and episode lists come from
/// `/shows/{id}/episodes`. Every call issues exactly one request; nothing
/// is cached or retried.
#[derive(Debug, Clone)]
pub struct TvMazeCatalog {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl Default for TvMazeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TvMazeCatalog {
    /// Creates a catalog talking to the public TVMaze API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a catalog talking to a TVMaze-compatible service at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Converts a TVMaze search result to our ShowSummary.
    fn convert_show(result: TvMazeSearchResult) -> ShowSummary {
        let show = result.show;
        ShowSummary {
            id: ShowId(show.id),
            name: show.name,
            summary: show.summary,
            image: image_or_placeholder(show.image.and_then(|image| image.original)),
        }
    }

    /// Converts a TVMaze episode to our EpisodeSummary.
    ///
    /// Rejects episodes without a positive season and episode number.
    /// Untitled episodes are named "Unknown".
    fn convert_episode(episode: TvMazeEpisode) -> Result<EpisodeSummary, CatalogError> {
        let season = episode.season.filter(|&season| season >= 1).ok_or_else(|| {
            CatalogError::MalformedResponse(format!(
                "Episode {} has no valid season number",
                episode.id
            ))
        })?;
        let number = episode.number.filter(|&number| number >= 1).ok_or_else(|| {
            CatalogError::MalformedResponse(format!(
                "Episode {} has no valid episode number",
                episode.id
            ))
        })?;

        Ok(EpisodeSummary {
            id: episode.id,
            name: episode.name.unwrap_or_else(|| "Unknown".to_string()),
            season,
            number,
            image: image_or_placeholder(episode.image.and_then(|image| image.original)),
        })
    }

    /// Checks the response status and parses the JSON body.
    fn parse_response<T>(response: Response) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .json()
            .map_err(|e| CatalogError::MalformedResponse(e.to_string()))
    }
}

impl ShowCatalog for TvMazeCatalog {
    fn search_shows(&self, query: &str) -> Result<Vec<ShowSummary>, CatalogError> {
        let url = format!("{}/search/shows", self.base_url);
        log::debug!("Searching shows: GET {url}?q={query}");

        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        let results: Vec<TvMazeSearchResult> = Self::parse_response(response)?;
        let shows: Vec<ShowSummary> = results.into_iter().map(Self::convert_show).collect();

        log::debug!("Search for '{query}' returned {} show(s)", shows.len());
        Ok(shows)
    }

    fn get_episodes(&self, show_id: ShowId) -> Result<Vec<EpisodeSummary>, CatalogError> {
        let url = format!("{}/shows/{}/episodes", self.base_url, show_id);
        log::debug!("Fetching episodes: GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::ShowNotFound(show_id));
        }

        let episodes: Vec<TvMazeEpisode> = Self::parse_response(response)?;
        // Episodes without a valid season or number (specials) are skipped
        let episodes: Vec<EpisodeSummary> = episodes
            .into_iter()
            .filter_map(|episode| {
                Self::convert_episode(episode)
                    .map_err(|err| log::warn!("Skipping episode of show {show_id}: {err}"))
                    .ok()
            })
            .collect();

        log::debug!("Show {show_id} has {} episode(s)", episodes.len());
        Ok(episodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PLACEHOLDER_IMAGE;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serves a single canned HTTP response and reports the request line.
    ///
    /// The listener is dropped after the first connection, so a second
    /// request from the client would fail.
    fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            tx.send(request_line.trim_end().to_string()).unwrap();
        });

        (format!("http://{addr}"), rx)
    }

    /// Catalog that bypasses any proxy configured in the environment.
    fn local_catalog(base_url: String) -> TvMazeCatalog {
        TvMazeCatalog {
            client: reqwest::blocking::Client::builder().no_proxy().build().unwrap(),
            ..TvMazeCatalog::with_base_url(base_url)
        }
    }

    const SEARCH_BODY: &str = r#"[
        {"score": 0.9, "show": {"id": 975, "name": "Batman", "summary": "<p>Wham! <b>Pow!</b></p>",
            "image": {"medium": "https://img.example/m/975.jpg", "original": "https://img.example/o/975.jpg"}}},
        {"score": 0.7, "show": {"id": 481, "name": "Batman Beyond", "summary": null, "image": null}}
    ]"#;

    const EPISODES_BODY: &str = r#"[
        {"id": 10, "name": "Pilot", "season": 1, "number": 1, "image": {"original": "https://img.example/e10.jpg"}},
        {"id": 11, "name": "Second", "season": 1, "number": 2, "image": null},
        {"id": 20, "name": "Return", "season": 2, "number": 1}
    ]"#;

    #[test]
    fn test_search_shows_normalizes_results() {
        let (base_url, requests) = serve_once("200 OK", SEARCH_BODY);
        let catalog = local_catalog(base_url);

        let shows = catalog.search_shows("batman").unwrap();

        assert_eq!(requests.recv().unwrap(), "GET /search/shows?q=batman HTTP/1.1");
        assert_eq!(shows.len(), 2);
        assert_eq!(shows[0].id, ShowId(975));
        assert_eq!(shows[0].name, "Batman");
        assert_eq!(shows[0].summary.as_deref(), Some("<p>Wham! <b>Pow!</b></p>"));
        assert_eq!(shows[0].image, "https://img.example/o/975.jpg");
        assert_eq!(shows[1].id, ShowId(481));
        assert_eq!(shows[1].summary, None);
        assert_eq!(shows[1].image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_search_shows_encodes_query() {
        let (base_url, requests) = serve_once("200 OK", "[]");
        let catalog = local_catalog(format!("{base_url}/"));

        let shows = catalog.search_shows("star trek").unwrap();

        assert!(shows.is_empty());
        assert_eq!(requests.recv().unwrap(), "GET /search/shows?q=star+trek HTTP/1.1");
    }

    #[test]
    fn test_get_episodes_preserves_order() {
        let (base_url, requests) = serve_once("200 OK", EPISODES_BODY);
        let catalog = local_catalog(base_url);

        let episodes = catalog.get_episodes(ShowId(5)).unwrap();

        assert_eq!(requests.recv().unwrap(), "GET /shows/5/episodes HTTP/1.1");
        let ids: Vec<u64> = episodes.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![10, 11, 20]);
        assert_eq!(episodes[0].image, "https://img.example/e10.jpg");
        assert_eq!(episodes[1].image, PLACEHOLDER_IMAGE);
        assert_eq!(episodes[2].image, PLACEHOLDER_IMAGE);
        assert_eq!((episodes[2].season, episodes[2].number), (2, 1));
    }

    #[test]
    fn test_get_episodes_keeps_untitled_episode() {
        let (base_url, _requests) = serve_once(
            "200 OK",
            r#"[{"id": 1, "name": "Pilot", "season": 1, "number": 1},
                {"id": 2, "name": null, "season": 1, "number": 2}]"#,
        );
        let catalog = local_catalog(base_url);

        let episodes = catalog.get_episodes(ShowId(5)).unwrap();

        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].name, "Pilot");
        assert_eq!(episodes[1].name, "Unknown");
        assert_eq!(episodes[1].number, 2);
    }

    #[test]
    fn test_get_episodes_skips_specials_in_order() {
        let (base_url, _requests) = serve_once(
            "200 OK",
            r#"[{"id": 1, "name": "Pilot", "season": 1, "number": 1},
                {"id": 2, "name": "Holiday Special", "season": 1, "number": null},
                {"id": 3, "name": "Second", "season": 1, "number": 2},
                {"id": 4, "name": "Zero", "season": 0, "number": 1},
                {"id": 5, "name": "Finale", "season": 2, "number": 1}]"#,
        );
        let catalog = local_catalog(base_url);

        let episodes = catalog.get_episodes(ShowId(5)).unwrap();

        let ids: Vec<u64> = episodes.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_get_episodes_unknown_show() {
        let (base_url, _requests) = serve_once("404 Not Found", "{}");
        let catalog = local_catalog(base_url);

        let err = catalog.get_episodes(ShowId(99)).unwrap_err();
        assert!(matches!(err, CatalogError::ShowNotFound(ShowId(99))));
    }

    #[test]
    fn test_server_error_maps_to_status() {
        let (base_url, _requests) = serve_once("500 Internal Server Error", "{}");
        let catalog = local_catalog(base_url);

        let err = catalog.search_shows("batman").unwrap_err();
        assert!(matches!(err, CatalogError::Status { status: 500, .. }));
    }

    #[test]
    fn test_unexpected_json_is_malformed() {
        let (base_url, _requests) = serve_once("200 OK", r#"{"shows": []}"#);
        let catalog = local_catalog(base_url);

        let err = catalog.search_shows("batman").unwrap_err();
        assert!(matches!(err, CatalogError::MalformedResponse(_)));
    }

    #[test]
    fn test_convert_episode_rejects_missing_number() {
        let episode: TvMazeEpisode = serde_json::from_str(
            r#"{"id": 7, "name": "Special", "season": 1, "number": null, "image": null}"#,
        )
        .unwrap();
        let err = TvMazeCatalog::convert_episode(episode).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedResponse(_)));

        let episode: TvMazeEpisode =
            serde_json::from_str(r#"{"id": 8, "name": "Zero", "season": 0, "number": 1}"#).unwrap();
        assert!(TvMazeCatalog::convert_episode(episode).is_err());

        let episode: TvMazeEpisode =
            serde_json::from_str(r#"{"id": 9, "season": 3, "number": 4}"#).unwrap();
        let episode = TvMazeCatalog::convert_episode(episode).unwrap();
        assert_eq!(episode.name, "Unknown");
    }

    #[test]
    fn test_convert_show_without_original_variant() {
        let result: TvMazeSearchResult = serde_json::from_str(
            r#"{"show": {"id": 1, "name": "A", "summary": "", "image": {"medium": "https://img.example/m.jpg"}}}"#,
        )
        .unwrap();
        let show = TvMazeCatalog::convert_show(result);
        assert_eq!(show.image, PLACEHOLDER_IMAGE);
        assert_eq!(show.summary.as_deref(), Some(""));
    }

    #[test]
    fn test_unreachable_service_is_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let catalog = local_catalog(format!("http://{addr}"));
        let err = catalog.search_shows("batman").unwrap_err();
        assert!(matches!(err, CatalogError::Request(_)));
    }
}
