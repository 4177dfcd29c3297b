//! Browser controller
//!
//! Binds user actions (submitting a search, opening a show's episodes) to the
//! catalog and applies the results to the [`BrowserState`]. Fetch failures are
//! returned as typed outcomes and recorded as a [`Notice`], never raised.
//!
//! Every request gets a ticket with a monotonic sequence number. A result is
//! only applied when its ticket is still the latest of its kind, so a slow
//! response can never overwrite the results of a newer request.

use crate::catalog::{CatalogError, EpisodeSummary, ShowCatalog, ShowId, ShowSummary};
use crate::view::{BrowserState, Mode, Notice, Screen, render};

/// Result of submitting a search.
#[derive(Debug)]
pub enum SearchOutcome {
    /// The query was blank; nothing was requested and nothing changed
    Ignored,
    /// The shows grid now holds this many shows
    Shown(usize),
    /// The request failed; the shows grid is empty
    Failed(CatalogError),
    /// A newer search was started before this one completed
    Stale,
}

/// Result of opening the episodes of a show.
#[derive(Debug)]
pub enum EpisodesOutcome {
    /// The episodes area is visible and holds this many episodes
    Shown(usize),
    /// The request failed; the episodes list is empty and, if the area was
    /// visible, it now belongs to the requested show
    Failed(CatalogError),
    /// A newer search or episodes request was started before this one completed
    Stale,
}

/// Handle for an in-flight search.
#[derive(Debug, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    /// The normalized query to send to the catalog.
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Handle for an in-flight episodes request.
#[derive(Debug, PartialEq, Eq)]
pub struct EpisodesTicket {
    seq: u64,
    show_id: ShowId,
}

impl EpisodesTicket {
    pub fn show_id(&self) -> ShowId {
        self.show_id
    }
}

/// Drives the search and episodes flows against a catalog.
#[derive(Debug)]
pub struct Browser<C> {
    catalog: C,
    state: BrowserState,
    next_seq: u64,
    latest_search: u64,
    latest_episodes: u64,
}

impl<C> Browser<C>
where
    C: ShowCatalog,
{
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            state: BrowserState::new(),
            next_seq: 0,
            latest_search: 0,
            latest_episodes: 0,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn render(&self) -> Screen {
        render(&self.state)
    }

    /// Removes and returns the notice about the last failed fetch, if any.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.state.take_notice()
    }

    /// Recovers the show a rendered show card belongs to.
    pub fn show_id_for_card(&self, index: usize) -> Option<ShowId> {
        self.state.shows().get(index).map(|show| show.id)
    }

    /// Runs a complete search: fetch, then apply the result.
    pub fn submit_search(&mut self, query: &str) -> SearchOutcome {
        let Some(ticket) = self.begin_search(query) else {
            return SearchOutcome::Ignored;
        };
        let result = self.catalog.search_shows(ticket.query());
        self.complete_search(ticket, result)
    }

    /// Fetches and shows the episodes of a show.
    pub fn open_episodes(&mut self, show_id: ShowId) -> EpisodesOutcome {
        let ticket = self.begin_episodes(show_id);
        let result = self.catalog.get_episodes(show_id);
        self.complete_episodes(ticket, result)
    }

    /// Starts a search.
    ///
    /// Returns `None` without touching the state when the query is blank.
    /// Otherwise hides the episodes area and clears the shows grid.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            log::debug!("Ignoring blank search query");
            return None;
        }

        self.state.hide_episodes();
        self.state.clear_shows();
        self.state.take_notice();

        let seq = self.issue_seq();
        self.latest_search = seq;
        Some(SearchTicket {
            seq,
            query: query.to_string(),
        })
    }

    /// Applies the result of a search started with [`Browser::begin_search`].
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<ShowSummary>, CatalogError>,
    ) -> SearchOutcome {
        if ticket.seq != self.latest_search {
            log::warn!("Discarding stale results for search '{}'", ticket.query);
            return SearchOutcome::Stale;
        }

        match result {
            Ok(shows) => {
                let count = shows.len();
                self.state.populate_shows(shows);
                SearchOutcome::Shown(count)
            }
            Err(err) => {
                log::warn!("Search for '{}' failed: {err}", ticket.query);
                self.state.set_notice(Notice::fetch_failed(&err));
                SearchOutcome::Failed(err)
            }
        }
    }

    /// Starts fetching the episodes of a show.
    pub fn begin_episodes(&mut self, show_id: ShowId) -> EpisodesTicket {
        self.state.take_notice();

        let seq = self.issue_seq();
        self.latest_episodes = seq;
        EpisodesTicket { seq, show_id }
    }

    /// Applies the result of a request started with [`Browser::begin_episodes`].
    pub fn complete_episodes(
        &mut self,
        ticket: EpisodesTicket,
        result: Result<Vec<EpisodeSummary>, CatalogError>,
    ) -> EpisodesOutcome {
        if ticket.seq != self.latest_episodes || ticket.seq < self.latest_search {
            log::warn!("Discarding stale episodes of show {}", ticket.show_id);
            return EpisodesOutcome::Stale;
        }

        match result {
            Ok(episodes) => {
                let count = episodes.len();
                self.state.populate_episodes(ticket.show_id, episodes);
                EpisodesOutcome::Shown(count)
            }
            Err(err) => {
                log::warn!("Fetching episodes of show {} failed: {err}", ticket.show_id);
                self.state.fail_episodes(ticket.show_id);
                self.state.set_notice(Notice::fetch_failed(&err));
                EpisodesOutcome::Failed(err)
            }
        }
    }

    fn issue_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}
