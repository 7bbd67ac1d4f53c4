//! Debounced incremental search
//!
//! A [`SearchSession`] turns raw keystrokes into at most one search request per
//! pause in typing and publishes what should be displayed through a
//! [`tokio::sync::watch`] channel.
//!
//! ```text
//! Idle -> Typing -> Querying -> Displaying -> Idle
//! ```
//!
//! Every request is tagged with a generation number. A response whose generation
//! is older than the latest keystroke or close is dropped, so a slow response can
//! never overwrite newer results.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::{error::FetchError, models::SearchResult, services::tmdb::TmdbClient};

/// Queries shorter than this (after trimming) never reach the network
pub const MIN_QUERY_CHARS: usize = 2;

/// Maximum number of suggestions shown
pub const MAX_SUGGESTIONS: usize = 5;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Source of raw multi-search items
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Value>, FetchError>;
}

#[async_trait::async_trait]
impl SearchBackend for TmdbClient {
    async fn search(&self, query: &str) -> Result<Vec<Value>, FetchError> {
        self.search_multi(query).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Typing,
    Querying,
    Displaying,
}

/// Snapshot of what the search box shows
#[derive(Debug, Clone, PartialEq)]
pub struct SearchView {
    pub state: SearchState,
    pub query: String,
    pub results: Vec<SearchResult>,
}

impl Default for SearchView {
    fn default() -> Self {
        Self {
            state: SearchState::Idle,
            query: String::new(),
            results: Vec::new(),
        }
    }
}

#[derive(Debug)]
enum SearchCommand {
    Input(String),
    Focus,
    Close,
}

/// Handle to a running search session
///
/// Dropping every handle stops the background task.
#[derive(Clone)]
pub struct SearchSession {
    commands: mpsc::UnboundedSender<SearchCommand>,
    view: watch::Receiver<SearchView>,
}

impl SearchSession {
    /// Spawns the session task on the current runtime
    pub fn spawn(backend: Arc<dyn SearchBackend>, debounce: Duration) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (view_tx, view) = watch::channel(SearchView::default());

        let task = SearchTask {
            backend,
            debounce,
            view: view_tx,
            current: SearchView::default(),
            deadline: None,
            generation: 0,
        };
        tokio::spawn(task.run(command_rx));

        Self { commands, view }
    }

    /// Replaces the typed query, restarting the debounce window
    pub fn input(&self, query: impl Into<String>) {
        self.send(SearchCommand::Input(query.into()));
    }

    /// Re-opens held results when the query is long enough
    pub fn focus(&self) {
        self.send(SearchCommand::Focus);
    }

    /// Hides the results without clearing the typed query
    pub fn close(&self) {
        self.send(SearchCommand::Close);
    }

    /// Current view
    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every view change
    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.clone()
    }

    fn send(&self, command: SearchCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!("Search session task has stopped");
        }
    }
}

type SearchOutcome = (u64, String, Result<Vec<Value>, FetchError>);

struct SearchTask {
    backend: Arc<dyn SearchBackend>,
    debounce: Duration,
    view: watch::Sender<SearchView>,
    current: SearchView,
    deadline: Option<Instant>,
    generation: u64,
}

impl SearchTask {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<SearchCommand>) {
        let (outcome_tx, mut outcomes) = mpsc::unbounded_channel::<SearchOutcome>();

        loop {
            let deadline = self.deadline;
            let debounce_elapsed = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                _ = debounce_elapsed => self.window_elapsed(&outcome_tx),
                Some((generation, query, outcome)) = outcomes.recv() => {
                    self.response(generation, &query, outcome)
                }
            }
        }

        tracing::debug!("Search session stopped");
    }

    fn handle(&mut self, command: SearchCommand) {
        match command {
            SearchCommand::Input(query) => {
                self.generation += 1;
                self.deadline = Some(Instant::now() + self.debounce);
                self.current.query = query;
                self.set_state(SearchState::Typing);
            }
            SearchCommand::Focus => {
                if query_is_searchable(&self.current.query)
                    && !self.current.results.is_empty()
                    && self.current.state == SearchState::Idle
                {
                    self.set_state(SearchState::Displaying);
                }
            }
            SearchCommand::Close => {
                self.generation += 1;
                self.deadline = None;
                self.set_state(SearchState::Idle);
            }
        }
    }

    fn window_elapsed(&mut self, outcome_tx: &mpsc::UnboundedSender<SearchOutcome>) {
        self.deadline = None;

        if !query_is_searchable(&self.current.query) {
            self.current.results.clear();
            self.set_state(SearchState::Idle);
            return;
        }

        let generation = self.generation;
        let query = self.current.query.trim().to_string();
        let backend = self.backend.clone();
        let outcome_tx = outcome_tx.clone();

        tracing::debug!(query = %query, generation, "Issuing search request");
        tokio::spawn(async move {
            let outcome = backend.search(&query).await;
            if outcome_tx.send((generation, query, outcome)).is_err() {
                tracing::debug!(generation, "Search session stopped before response arrived");
            }
        });

        self.set_state(SearchState::Querying);
    }

    fn response(
        &mut self,
        generation: u64,
        query: &str,
        outcome: Result<Vec<Value>, FetchError>,
    ) {
        if generation != self.generation {
            tracing::debug!(
                query = %query,
                generation,
                latest = self.generation,
                "Discarding superseded search response"
            );
            return;
        }

        match outcome {
            Ok(items) => {
                self.current.results = SearchResult::collect(&items, Some(MAX_SUGGESTIONS));
                self.set_state(SearchState::Displaying);
            }
            Err(e) => {
                tracing::error!(query = %query, error = %e, "Search error");
                self.set_state(SearchState::Idle);
            }
        }
    }

    fn set_state(&mut self, state: SearchState) {
        self.current.state = state;
        self.view.send_replace(self.current.clone());
    }
}

fn query_is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}
