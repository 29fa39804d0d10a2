//! Dedup store: which trades have already been delivered.
//!
//! Records are held in memory and optionally mirrored to a [`DeliveredLog`].
//! A record is created only after the sink acknowledged delivery. It stops
//! suppressing redelivery once it expires, or once the trade's content
//! fingerprint no longer matches (the trade changed state since delivery).
//!
//! Capacity is bounded: when `max_entries` is exceeded the oldest deliveries
//! are evicted first.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::domain::delivered::DeliveredRecord;
use crate::domain::id::TradeId;
use crate::domain::stats::DedupStats;
use crate::domain::trade::Trade;
use crate::error::Result;
use crate::port::DeliveredLog;

/// Records keyed by id, plus an index ordered by delivery time.
///
/// Both halves always hold the same set of trades.
#[derive(Default)]
struct Entries {
    records: HashMap<TradeId, DeliveredRecord>,
    by_age: BTreeSet<(DateTime<Utc>, TradeId)>,
}

impl Entries {
    fn insert(&mut self, record: DeliveredRecord) {
        let key = (record.delivered_at, record.id.clone());
        if let Some(previous) = self.records.insert(record.id.clone(), record) {
            self.by_age.remove(&(previous.delivered_at, previous.id));
        }
        self.by_age.insert(key);
    }

    fn remove(&mut self, id: &TradeId) -> Option<DeliveredRecord> {
        let record = self.records.remove(id)?;
        self.by_age.remove(&(record.delivered_at, record.id.clone()));
        Some(record)
    }

    fn pop_oldest(&mut self) -> Option<DeliveredRecord> {
        let (_, id) = self.by_age.pop_first()?;
        self.records.remove(&id)
    }

    fn oldest(&self) -> Option<&DeliveredRecord> {
        self.by_age
            .first()
            .and_then(|(_, id)| self.records.get(id))
    }

    fn evict_over(&mut self, max_entries: usize) -> usize {
        let mut evicted = 0;
        while self.records.len() > max_entries && self.pop_oldest().is_some() {
            evicted += 1;
        }
        evicted
    }

    /// Oldest first.
    fn iter(&self) -> impl Iterator<Item = &DeliveredRecord> {
        self.by_age.iter().filter_map(|(_, id)| self.records.get(id))
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// In-memory dedup store with optional durable backing.
pub struct DedupStore {
    entries: RwLock<Entries>,
    ttl: Option<chrono::Duration>,
    max_entries: usize,
    log: Option<Box<dyn DeliveredLog>>,
    /// Set whenever memory diverges from the log.
    dirty: AtomicBool,
}

impl DedupStore {
    /// Create a memory-only store.
    ///
    /// `ttl` of `None` keeps records until evicted by capacity.
    #[must_use]
    pub fn new(ttl: Option<Duration>, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            ttl: ttl.and_then(|d| chrono::Duration::from_std(d).ok()),
            max_entries: max_entries.max(1),
            log: None,
            dirty: AtomicBool::new(false),
        }
    }

    /// Create a store backed by `log`, rehydrating non-expired records.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read.
    pub fn open(
        ttl: Option<Duration>,
        max_entries: usize,
        log: Box<dyn DeliveredLog>,
    ) -> Result<Self> {
        let mut store = Self::new(ttl, max_entries);
        let loaded = log.load()?;
        let total = loaded.len();
        let now = Utc::now();

        {
            let entries = store.entries.get_mut();
            for record in loaded {
                if !record.is_expired(store.ttl, now) {
                    entries.insert(record);
                }
            }
            entries.evict_over(store.max_entries);
        }

        info!(
            backend = log.backend_name(),
            loaded = store.len(),
            discarded = total - store.len(),
            "Dedup store rehydrated"
        );
        store.log = Some(log);
        Ok(store)
    }

    /// Whether `id` was delivered and the record is still authoritative.
    ///
    /// When `fingerprint` is given and differs from the stored one, the record
    /// is stale and this returns `false` so the trade is delivered again.
    pub fn is_delivered(&self, id: &TradeId, fingerprint: Option<&str>) -> bool {
        self.is_delivered_at(id, fingerprint, Utc::now())
    }

    fn is_delivered_at(&self, id: &TradeId, fingerprint: Option<&str>, now: DateTime<Utc>) -> bool {
        {
            let entries = self.entries.read();
            match entries.records.get(id) {
                None => return false,
                Some(record) if !record.is_expired(self.ttl, now) => {
                    if record.matches(fingerprint) {
                        return true;
                    }
                    debug!(trade_id = %id, "Trade changed since delivery, treating as new");
                    return false;
                }
                Some(_) => {}
            }
        }

        // Expired: drop it lazily. Re-check under the write lock.
        let mut entries = self.entries.write();
        if entries
            .records
            .get(id)
            .is_some_and(|r| r.is_expired(self.ttl, now))
        {
            entries.remove(id);
            self.dirty.store(true, Ordering::Release);
        }
        false
    }

    /// Record a confirmed delivery of `trade`.
    ///
    /// Idempotent: re-marking identical content only refreshes the timestamp.
    pub fn mark_delivered(&self, trade: &Trade) {
        self.mark_delivered_at(trade, Utc::now());
    }

    fn mark_delivered_at(&self, trade: &Trade, now: DateTime<Utc>) {
        let record = DeliveredRecord::new(trade.id.clone(), now, Some(trade.fingerprint()));
        let mut entries = self.entries.write();
        entries.insert(record);
        let evicted = entries.evict_over(self.max_entries);
        self.dirty.store(true, Ordering::Release);

        if evicted > 0 {
            debug!(evicted, "Dedup store over capacity, evicted oldest records");
        }
    }

    /// Remove every expired record. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        if self.ttl.is_none() {
            return 0;
        }
        let mut entries = self.entries.write();
        let mut removed = 0;
        while entries
            .oldest()
            .is_some_and(|r| r.is_expired(self.ttl, now))
        {
            entries.pop_oldest();
            removed += 1;
        }
        if removed > 0 {
            self.dirty.store(true, Ordering::Release);
            debug!(removed, "Purged expired dedup records");
        }
        removed
    }

    /// Persist to the durable log, if one is configured and anything changed.
    ///
    /// Returns `true` when a write happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the log write fails. The store stays dirty so the
    /// next flush retries.
    pub fn flush(&self) -> Result<bool> {
        let Some(log) = &self.log else {
            return Ok(false);
        };
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(false);
        }

        let records: Vec<DeliveredRecord> = self.entries.read().iter().cloned().collect();

        if let Err(e) = log.persist(&records) {
            self.dirty.store(true, Ordering::Release);
            warn!(backend = log.backend_name(), error = %e, "Failed to persist dedup store");
            return Err(e);
        }
        debug!(backend = log.backend_name(), records = records.len(), "Dedup store persisted");
        Ok(true)
    }

    /// Whether a durable log backs this store.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.log.is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occupancy statistics.
    #[must_use]
    pub fn stats(&self) -> DedupStats {
        let now = Utc::now();
        let entries = self.entries.read();
        let expired = entries
            .iter()
            .take_while(|r| r.is_expired(self.ttl, now))
            .count();

        DedupStats {
            count: entries.len(),
            active: entries.len() - expired,
            expired,
            ttl_secs: self
                .ttl
                .map(|ttl| u64::try_from(ttl.num_seconds()).unwrap_or(0)),
            max_entries: self.max_entries,
            backend: self.log.as_ref().map_or("memory", |l| l.backend_name()),
        }
    }
}
