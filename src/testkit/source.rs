//! Scripted [`TradeSource`] for pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::trade::Trade;
use crate::error::SourceError;
use crate::port::{TradePage, TradeSource};

/// A source serving pre-loaded pages.
///
/// Pages can be replaced between scans through the `&self` setters, which
/// lets one test drive several scan cycles against evolving data. Pages that
/// were never scripted come back empty.
pub struct ScriptedSource {
    total_pages: u32,
    pages: Mutex<HashMap<u32, Result<Vec<Trade>, SourceError>>>,
    unavailable: AtomicBool,
    latency: Option<Duration>,
    requested: Mutex<Vec<u32>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(total_pages: u32) -> Self {
        Self {
            total_pages,
            pages: Mutex::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
            latency: None,
            requested: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_page(self, page: u32, trades: Vec<Trade>) -> Self {
        self.set_page(page, trades);
        self
    }

    /// Make `page` fail with a timeout.
    pub fn with_failure(self, page: u32) -> Self {
        self.pages.lock().insert(
            page,
            Err(SourceError::Unavailable {
                page,
                reason: "request timed out".into(),
            }),
        );
        self
    }

    /// Delay every page response.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn set_page(&self, page: u32, trades: Vec<Trade>) {
        self.pages.lock().insert(page, Ok(trades));
    }

    /// Fail every request, page 1 included, until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Pages requested so far, in request order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested.lock().clone()
    }

    /// Highest number of concurrently running fetches observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TradeSource for ScriptedSource {
    async fn fetch_page(&self, page: u32) -> Result<TradePage, SourceError> {
        self.requested.lock().push(page);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable {
                page,
                reason: "connection refused".into(),
            });
        }

        let trades = match self.pages.lock().get(&page) {
            Some(Ok(trades)) => trades.clone(),
            Some(Err(e)) => return Err(e.clone()),
            None => Vec::new(),
        };
        let total_pages = self.total_pages;

        Ok(TradePage {
            total_count: trades.len() as u64,
            trades,
            total_pages,
            current_page: Some(page),
        })
    }
}
