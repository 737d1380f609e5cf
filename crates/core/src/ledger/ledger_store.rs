//! Ledger store: fetches, computes and publishes one entity's ledger.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::Serialize;

use super::ledger_calculator::{compute_ledger, summarize_movements};
use super::ledger_model::{LedgerEntry, LedgerQuery, LedgerReport, LedgerSummary};
use super::ledger_normalizer::normalize_records;
use super::ledger_traits::{LedgerRecord, TransactionSourceTrait};
use crate::errors::Result;

/// Options controlling what a store fetches per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerStoreOptions {
    /// Fetch the before-range history to report true prior and till-date
    /// totals, and reconcile it against the backend's balance.
    pub include_prior_totals: bool,
}

/// State published to the view layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerViewState {
    pub ledger_data: Vec<LedgerEntry>,
    pub summary: Option<LedgerSummary>,
    pub loading: bool,
    pub has_searched: bool,
    pub error: Option<String>,
}

/// How a `compute_ledger` call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerOutcome {
    /// The report was computed and published.
    Applied(LedgerReport),
    /// The request failed; the message was published as the store's error.
    Failed(String),
    /// A newer request started before this one finished; its result was dropped.
    Superseded,
}

/// Orchestrates one entity kind's ledger reports.
///
/// Every call takes a fresh request token. When a call settles, its result is
/// published only if no newer call has started since, so a slow response can
/// never overwrite a fast later one.
pub struct LedgerStore<R: LedgerRecord> {
    source: Arc<dyn TransactionSourceTrait<R>>,
    options: LedgerStoreOptions,
    state: RwLock<LedgerViewState>,
    latest_request: AtomicU64,
}

impl<R: LedgerRecord> LedgerStore<R> {
    /// Creates a new LedgerStore instance.
    pub fn new(source: Arc<dyn TransactionSourceTrait<R>>, options: LedgerStoreOptions) -> Self {
        Self {
            source,
            options,
            state: RwLock::new(LedgerViewState::default()),
            latest_request: AtomicU64::new(0),
        }
    }

    /// Copy of the currently published state.
    pub fn snapshot(&self) -> LedgerViewState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Clears published data and invalidates any in-flight request.
    pub fn reset(&self) {
        self.latest_request.fetch_add(1, Ordering::SeqCst);
        *self.write_state() = LedgerViewState::default();
    }

    /// Computes the ledger for `entity_id` over `query` and publishes it.
    ///
    /// Failures are converted to a user-facing message and published as the
    /// store's error; nothing is retried.
    pub async fn compute_ledger(&self, entity_id: &str, query: LedgerQuery) -> LedgerOutcome {
        let token = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "[LedgerStore] Request {} for {} {} from {} to {}",
            token,
            R::KIND,
            entity_id,
            query.from_date,
            query.to_date
        );

        self.write_state().loading = true;
        let mut guard = LoadingGuard {
            store: self,
            token,
            armed: true,
        };

        let result = self.build_report(entity_id, query).await;

        // From here on the guard's job is done by the publishing code below.
        guard.armed = false;

        if !self.is_latest(token) {
            debug!(
                "[LedgerStore] Discarding superseded request {} for {} {}",
                token,
                R::KIND,
                entity_id
            );
            return LedgerOutcome::Superseded;
        }

        let mut state = self.write_state();
        state.loading = false;
        state.has_searched = true;

        match result {
            Ok(report) => {
                info!(
                    "[LedgerStore] Published {} ledger for {} with {} entries",
                    R::KIND,
                    entity_id,
                    report.entries.len()
                );
                state.ledger_data = report.entries.clone();
                state.summary = Some(report.summary.clone());
                state.error = None;
                LedgerOutcome::Applied(report)
            }
            Err(err) => {
                warn!(
                    "[LedgerStore] {} ledger for {} failed: {}",
                    R::KIND,
                    entity_id,
                    err
                );
                let message = err.user_message();
                state.ledger_data.clear();
                state.summary = None;
                state.error = Some(message.clone());
                LedgerOutcome::Failed(message)
            }
        }
    }

    async fn build_report(&self, entity_id: &str, query: LedgerQuery) -> Result<LedgerReport> {
        query.validate()?;
        let prior_until = if self.options.include_prior_totals {
            Some(query.day_before_range()?)
        } else {
            None
        };

        let (opening_balance, balance_before_range, records, prior_records) = futures::try_join!(
            self.source.opening_balance(entity_id),
            self.source.balance_as_of(entity_id, query.from_date),
            self.source
                .transactions(entity_id, Some(query.from_date), query.to_date),
            self.fetch_prior_records(entity_id, prior_until),
        )?;

        let entries = normalize_records(records)?;
        let outside = entries.iter().filter(|e| !query.contains(&e.date)).count();
        if outside > 0 {
            warn!(
                "[LedgerStore] {} {} entries for {} fall outside {} to {}",
                outside,
                R::KIND,
                entity_id,
                query.from_date,
                query.to_date
            );
        }

        let mut computation = compute_ledger(entries, balance_before_range, opening_balance)?;

        if let Some(prior_records) = prior_records {
            let prior = summarize_movements(&normalize_records(prior_records)?)?;
            computation.summary = computation.summary.with_prior_totals(prior)?;
        }

        Ok(LedgerReport::new(R::KIND, entity_id, query, computation))
    }

    async fn fetch_prior_records(
        &self,
        entity_id: &str,
        until: Option<NaiveDate>,
    ) -> Result<Option<Vec<R>>> {
        match until {
            Some(until) => Ok(Some(self.source.transactions(entity_id, None, until).await?)),
            None => Ok(None),
        }
    }

    fn is_latest(&self, token: u64) -> bool {
        self.latest_request.load(Ordering::SeqCst) == token
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, LedgerViewState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Clears `loading` when a request future is dropped before it settles.
struct LoadingGuard<'a, R: LedgerRecord> {
    store: &'a LedgerStore<R>,
    token: u64,
    armed: bool,
}

impl<R: LedgerRecord> Drop for LoadingGuard<'_, R> {
    fn drop(&mut self) {
        if self.armed && self.store.is_latest(self.token) {
            self.store.write_state().loading = false;
        }
    }
}
