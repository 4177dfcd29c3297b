//! View state and rendering
//!
//! The browser keeps everything it displays in a [`BrowserState`]. Rendering
//! is a pure projection of that state into cards, so the same state always
//! produces the same screen.

use crate::catalog::{CatalogError, EpisodeSummary, ShowId, ShowSummary};
use serde::Serialize;
use std::fmt;

/// Which area the user is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Episodes area hidden, the shows grid may be populated
    Browsing,
    /// Episodes area visible for exactly one show
    ViewingEpisodes(ShowId),
}

/// A message for the user about a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    /// Creates the notice shown when a catalog request failed.
    pub fn fetch_failed(error: &CatalogError) -> Self {
        Self {
            message: error.to_string(),
        }
    }
}

/// Everything the browser currently displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserState {
    shows: Vec<ShowSummary>,
    episodes: Vec<EpisodeSummary>,
    /// Show whose episodes are in the episodes area, if it is visible
    open_show: Option<ShowId>,
    notice: Option<Notice>,
}

impl BrowserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shows currently in the shows grid, in catalog order.
    pub fn shows(&self) -> &[ShowSummary] {
        &self.shows
    }

    /// The episodes currently in the episodes area, in catalog order.
    ///
    /// May be non-empty while the area is hidden.
    pub fn episodes(&self) -> &[EpisodeSummary] {
        &self.episodes
    }

    pub fn mode(&self) -> Mode {
        match self.open_show {
            Some(show_id) => Mode::ViewingEpisodes(show_id),
            None => Mode::Browsing,
        }
    }

    pub fn episodes_visible(&self) -> bool {
        self.open_show.is_some()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Replaces the shows grid with the given shows.
    pub fn populate_shows(&mut self, shows: Vec<ShowSummary>) {
        self.clear_shows();
        self.shows.extend(shows);
    }

    /// Replaces the episodes area with the episodes of a show and reveals it.
    pub fn populate_episodes(&mut self, show_id: ShowId, episodes: Vec<EpisodeSummary>) {
        self.clear_episodes();
        self.episodes.extend(episodes);
        self.open_show = Some(show_id);
    }

    /// Empties the episodes area after a failed request for `show_id`.
    ///
    /// A visible area stays visible and is attributed to `show_id`, so the
    /// mode never names a show whose episodes are no longer listed.
    pub fn fail_episodes(&mut self, show_id: ShowId) {
        self.clear_episodes();
        if self.open_show.is_some() {
            self.open_show = Some(show_id);
        }
    }

    pub fn clear_shows(&mut self) {
        self.shows.clear();
    }

    pub fn clear_episodes(&mut self) {
        self.episodes.clear();
    }

    pub fn hide_episodes(&mut self) {
        self.open_show = None;
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Removes and returns the pending notice.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

/// A rendered show in the shows grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowCard {
    /// Identifier of the show this card belongs to
    pub show_id: ShowId,
    pub image: String,
    pub name: String,
    /// Summary markup exactly as the catalog delivered it
    pub summary_html: Option<String>,
    /// Summary with markup stripped, for terminal display
    pub summary_text: String,
}

impl ShowCard {
    fn from_show(show: &ShowSummary) -> Self {
        Self {
            show_id: show.id,
            image: show.image.clone(),
            name: show.name.clone(),
            summary_html: show.summary.clone(),
            summary_text: summary_to_text(show.summary.as_deref()),
        }
    }
}

impl fmt::Display for ShowCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.show_id, self.name)?;
        writeln!(f, "  Image: {}", self.image)?;
        write!(f, "  {}", self.summary_text)
    }
}

/// A rendered episode in the episodes area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeCard {
    pub episode_id: u64,
    pub image: String,
    pub name: String,
    /// "season N - episode M"
    pub caption: String,
}

impl EpisodeCard {
    fn from_episode(episode: &EpisodeSummary) -> Self {
        Self {
            episode_id: episode.id,
            image: episode.image.clone(),
            name: episode.name.clone(),
            caption: format!("season {} - episode {}", episode.season, episode.number),
        }
    }
}

impl fmt::Display for EpisodeCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.name, self.caption)?;
        write!(f, "  Image: {}", self.image)
    }
}

/// The complete rendered output of a [`BrowserState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Screen {
    pub shows: Vec<ShowCard>,
    /// `None` while the episodes area is hidden
    pub episodes: Option<Vec<EpisodeCard>>,
    pub notice: Option<Notice>,
}

/// Renders the state into cards.
pub fn render(state: &BrowserState) -> Screen {
    Screen {
        shows: state.shows.iter().map(ShowCard::from_show).collect(),
        episodes: state
            .episodes_visible()
            .then(|| state.episodes.iter().map(EpisodeCard::from_episode).collect()),
        notice: state.notice.clone(),
    }
}

/// Converts summary markup to plain text for display.
fn summary_to_text(summary: Option<&str>) -> String {
    summary
        .map(|s| nanohtml2text::html2text(s).trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PLACEHOLDER_IMAGE;

    fn show(id: u64, name: &str) -> ShowSummary {
        ShowSummary {
            id: ShowId(id),
            name: name.to_string(),
            summary: Some(format!("<p>About <b>{name}</b></p>")),
            image: PLACEHOLDER_IMAGE.to_string(),
        }
    }

    fn episode(id: u64, season: u32, number: u32) -> EpisodeSummary {
        EpisodeSummary {
            id,
            name: format!("Episode {id}"),
            season,
            number,
            image: PLACEHOLDER_IMAGE.to_string(),
        }
    }

    #[test]
    fn test_populate_shows_twice_keeps_one_copy() {
        let shows = vec![show(1, "Alpha"), show(2, "Beta")];
        let mut state = BrowserState::new();

        state.populate_shows(shows.clone());
        state.populate_shows(shows.clone());

        assert_eq!(state.shows(), shows.as_slice());
        assert_eq!(render(&state).shows.len(), 2);
    }

    #[test]
    fn test_populate_episodes_reveals_area() {
        let mut state = BrowserState::new();
        assert_eq!(state.mode(), Mode::Browsing);
        assert_eq!(render(&state).episodes, None);

        state.populate_episodes(ShowId(5), vec![episode(1, 1, 1), episode(2, 1, 2)]);
        state.populate_episodes(ShowId(5), vec![episode(1, 1, 1), episode(2, 1, 2)]);

        assert_eq!(state.mode(), Mode::ViewingEpisodes(ShowId(5)));
        let cards = render(&state).episodes.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].caption, "season 1 - episode 2");
    }

    #[test]
    fn test_fail_episodes_attributes_visible_area() {
        let mut state = BrowserState::new();
        state.fail_episodes(ShowId(3));
        assert_eq!(state.mode(), Mode::Browsing);

        state.populate_episodes(ShowId(1), vec![episode(1, 1, 1)]);
        state.fail_episodes(ShowId(2));
        assert_eq!(state.mode(), Mode::ViewingEpisodes(ShowId(2)));
        assert_eq!(render(&state).episodes, Some(Vec::new()));
    }

    #[test]
    fn test_hidden_episodes_are_not_rendered() {
        let mut state = BrowserState::new();
        state.populate_episodes(ShowId(5), vec![episode(1, 1, 1)]);
        state.hide_episodes();

        assert_eq!(state.episodes().len(), 1);
        assert_eq!(render(&state).episodes, None);
    }

    #[test]
    fn test_show_card_carries_id_and_text_summary() {
        let mut state = BrowserState::new();
        state.populate_shows(vec![show(975, "Batman")]);

        let card = &render(&state).shows[0];
        assert_eq!(card.show_id, ShowId(975));
        assert_eq!(card.summary_html.as_deref(), Some("<p>About <b>Batman</b></p>"));
        assert!(!card.summary_text.contains('<'));
        assert!(card.summary_text.contains("Batman"));
        assert!(card.to_string().starts_with("[975] Batman"));
    }

    #[test]
    fn test_missing_summary_renders_empty() {
        assert_eq!(summary_to_text(None), "");
    }

    #[test]
    fn test_episode_card_display() {
        let card = EpisodeCard::from_episode(&episode(3, 2, 7));
        assert_eq!(
            card.to_string(),
            format!("Episode 3 (season 2 - episode 7)\n  Image: {PLACEHOLDER_IMAGE}")
        );
    }
}
