// ABOUTME: Debounced, paginated location typeahead
// Background tasks fetch city suggestions and report back over an mpsc channel

use super::state::{LocationData, LocationPick};
use crate::api::{LocationSuggestion, MarketplaceApi};
use crate::config::LocationConfig;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Debouncing,
    Loading,
    Results,
    Empty,
    Error(String),
}

/// Messages sent by search tasks
#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// Debounce elapsed and the request is going out
    Started { generation: u64, page: u32 },
    Finished {
        generation: u64,
        page: u32,
        result: Result<Vec<LocationSuggestion>, String>,
    },
}

impl SearchEvent {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Started { generation, .. } | Self::Finished { generation, .. } => *generation,
        }
    }
}

pub struct LocationSearch {
    api: Arc<dyn MarketplaceApi>,
    config: LocationConfig,
    query: String,
    phase: SearchPhase,
    suggestions: Vec<LocationSuggestion>,
    page: u32,
    has_more: bool,
    panel_open: bool,
    loading_more: bool,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    event_tx: mpsc::UnboundedSender<SearchEvent>,
    event_rx: mpsc::UnboundedReceiver<SearchEvent>,
}

impl LocationSearch {
    pub fn new(api: Arc<dyn MarketplaceApi>, config: LocationConfig) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            api,
            config,
            query: String::new(),
            phase: SearchPhase::Idle,
            suggestions: Vec::new(),
            page: 0,
            has_more: false,
            panel_open: false,
            loading_more: false,
            generation: 0,
            pending: None,
            event_tx,
            event_rx,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn suggestions(&self) -> &[LocationSuggestion] {
        &self.suggestions
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Counter bumped on every input change; events carry the value they were issued under
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Loading || self.loading_more
    }

    /// A request is scheduled or in flight
    pub fn is_busy(&self) -> bool {
        self.phase == SearchPhase::Debouncing || self.is_loading()
    }

    /// Handle a keystroke: cancel the pending search and restart the debounce.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_input(&mut self, text: &str) {
        self.cancel_pending();
        self.generation += 1;
        self.query = text.to_string();
        self.loading_more = false;

        if text.trim().chars().count() < self.config.min_query_len {
            self.suggestions.clear();
            self.page = 0;
            self.has_more = false;
            self.panel_open = false;
            self.phase = SearchPhase::Idle;
            return;
        }

        self.phase = SearchPhase::Debouncing;
        let delay = self.config.debounce();
        self.spawn_fetch(1, Some(delay));
    }

    /// Scroll position changed; loads the next page near the bottom of the list.
    ///
    /// Returns true when a page request was started.
    pub fn on_scroll(&mut self, scroll_top: u32, client_height: u32, scroll_height: u32) -> bool {
        let near_bottom = scroll_top.saturating_add(client_height)
            >= scroll_height.saturating_sub(self.config.scroll_threshold_px);
        if near_bottom && self.has_more && !self.is_busy() {
            return self.fetch_next_page();
        }
        false
    }

    /// Request the page after the last one received
    pub fn fetch_next_page(&mut self) -> bool {
        if !self.has_more || self.is_busy() {
            return false;
        }
        self.loading_more = true;
        self.spawn_fetch(self.page + 1, None);
        true
    }

    /// Apply one event; returns false when it belongs to an older query
    pub fn apply(&mut self, event: SearchEvent) -> bool {
        if event.generation() != self.generation {
            debug!("Ignoring stale location event for generation {}", event.generation());
            return false;
        }

        match event {
            SearchEvent::Started { page, .. } => {
                if page <= 1 {
                    self.phase = SearchPhase::Loading;
                }
            }
            SearchEvent::Finished { page, result, .. } => {
                self.pending = None;
                self.loading_more = false;
                match result {
                    Ok(batch) => {
                        self.has_more = batch.len() == self.config.page_size as usize;
                        if page <= 1 {
                            self.suggestions = batch;
                        } else {
                            self.suggestions.extend(batch);
                        }
                        self.page = page;
                        self.panel_open = true;
                        self.phase = if self.suggestions.is_empty() {
                            SearchPhase::Empty
                        } else {
                            SearchPhase::Results
                        };
                    }
                    Err(message) if page <= 1 => {
                        self.suggestions.clear();
                        self.has_more = false;
                        self.phase = SearchPhase::Error(message);
                    }
                    Err(message) => {
                        // rows already shown stay usable; stop paging until the next query
                        warn!("Location page {} failed: {}", page, message);
                        self.has_more = false;
                    }
                }
            }
        }
        true
    }

    /// Wait for the next task event and apply it
    pub async fn next_event(&mut self) -> Option<SearchEvent> {
        let event = self.event_rx.recv().await?;
        self.apply(event.clone());
        Some(event)
    }

    /// Drain events until the current request has finished
    pub async fn settle(&mut self) {
        while self.is_busy() {
            if self.next_event().await.is_none() {
                break;
            }
        }
    }

    /// Pick a suggestion, closing the panel and cancelling outstanding work
    pub fn select(&mut self, index: usize) -> Option<LocationPick> {
        let suggestion = self.suggestions.get(index)?.clone();
        let formatted = suggestion.display();

        let value = suggestion
            .pincode_id
            .or(suggestion.city_id)
            .map_or_else(|| formatted.clone(), |id| id.to_string());

        self.cancel_pending();
        self.generation += 1;
        self.query = formatted.clone();
        self.suggestions.clear();
        self.has_more = false;
        self.loading_more = false;
        self.panel_open = false;
        self.phase = SearchPhase::Idle;

        Some(LocationPick {
            formatted: formatted.clone(),
            data: LocationData {
                formatted,
                city: suggestion.city,
                pincode: suggestion.pincode,
                pincode_id: suggestion.pincode_id,
                city_id: suggestion.city_id,
            },
            value,
        })
    }

    fn spawn_fetch(&mut self, page: u32, delay: Option<std::time::Duration>) {
        let api = Arc::clone(&self.api);
        let tx = self.event_tx.clone();
        let generation = self.generation;
        let query = self.query.trim().to_string();
        let limit = self.config.page_size;

        self.pending = Some(tokio::spawn(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let _ = tx.send(SearchEvent::Started { generation, page });

            debug!("Searching locations for '{}' (page {})", query, page);
            let result = api
                .city_suggestions(&query, page, limit)
                .await
                .map_err(|e| {
                    warn!("Location search failed: {}", e);
                    e.to_string()
                });
            let _ = tx.send(SearchEvent::Finished {
                generation,
                page,
                result,
            });
        }));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for LocationSearch {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
