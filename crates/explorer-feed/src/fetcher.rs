//! Generic cursor-based incremental loader.
//!
//! A fetcher accumulates pages of one collection endpoint in cursor
//! order. Its contracts, in order of importance:
//!
//! - at most one outstanding request per fetcher; a `load_more` call
//!   while one is in flight (or past the last page) is a no-op.
//! - a failed page load leaves the accumulated items untouched and
//!   records a retryable error.
//! - `reset` bumps an epoch that acts as the cancellation token: a
//!   response carrying a stale epoch is discarded before any append,
//!   so items from two different networks or filter sets never mix.

use explorer_client::{IndexerApi, PageRequest};
use explorer_types::{FeedPage, PageCursor, Transaction, TransactionKind};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

/// Point-in-time state of a fetcher, published to observers on every
/// change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedSnapshot {
	pub items: Vec<Transaction>,
	pub is_loading_more: bool,
	pub is_reaching_end: bool,
	pub error: Option<String>,
}

/// What one `load_more` call did. Failures surface here and in the
/// snapshot's `error`, never as a propagated error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
	/// Appended this many items and advanced the cursor.
	Loaded(usize),
	/// No-op: end reached, a load was already in flight, or the
	/// response belonged to a superseded epoch.
	Skipped,
	/// Request or parse failed; accumulated items are unchanged and a
	/// later `load_more` retries.
	Failed,
}

struct FetcherState {
	base_url: String,
	kinds: Vec<TransactionKind>,
	items: Vec<Transaction>,
	cursor: PageCursor,
	is_last: bool,
	loading: bool,
	error: Option<String>,
	epoch: u64,
}

impl FetcherState {
	fn snapshot(&self) -> FeedSnapshot {
		FeedSnapshot {
			items: self.items.clone(),
			is_loading_more: self.loading,
			is_reaching_end: self.is_last,
			error: self.error.clone(),
		}
	}
}

/// Incremental loader over one paginated collection endpoint.
pub struct PaginatedFetcher {
	api: Arc<dyn IndexerApi>,
	limit: u32,
	pending_only: bool,
	state: Mutex<FetcherState>,
	snapshot_tx: watch::Sender<FeedSnapshot>,
}

impl PaginatedFetcher {
	/// The initial page comes from the caller (server-side bootstrap
	/// or [`FeedPage::empty`]); its origin is indistinguishable from
	/// a fetched page.
	pub fn new(
		api: Arc<dyn IndexerApi>,
		base_url: impl Into<String>,
		limit: u32,
		kinds: Vec<TransactionKind>,
		pending_only: bool,
		initial: FeedPage,
	) -> Self {
		let state = FetcherState {
			base_url: base_url.into(),
			kinds,
			items: initial.items,
			cursor: initial.cursor,
			is_last: initial.is_last,
			loading: false,
			error: None,
			epoch: 0,
		};
		let (snapshot_tx, _) = watch::channel(state.snapshot());
		Self {
			api,
			limit,
			pending_only,
			state: Mutex::new(state),
			snapshot_tx,
		}
	}

	pub async fn kinds(&self) -> Vec<TransactionKind> {
		self.state.lock().await.kinds.clone()
	}

	pub async fn snapshot(&self) -> FeedSnapshot {
		self.state.lock().await.snapshot()
	}

	/// Observers get a fresh snapshot whenever the state changes.
	pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
		self.snapshot_tx.subscribe()
	}

	/// Requests the next page and appends it in cursor order.
	pub async fn load_more(&self) -> LoadOutcome {
		let (request, base_url, epoch) = {
			let mut state = self.state.lock().await;
			if state.is_last || state.loading {
				return LoadOutcome::Skipped;
			}
			state.loading = true;
			self.publish(&state);
			(
				PageRequest {
					cursor: state.cursor,
					limit: self.limit,
					kinds: state.kinds.clone(),
				},
				state.base_url.clone(),
				state.epoch,
			)
		};

		let result = if self.pending_only {
			self.api.mempool_transactions(&base_url, &request).await
		} else {
			self.api.transactions(&base_url, &request).await
		};

		let mut state = self.state.lock().await;
		if state.epoch != epoch {
			// Superseded by a reset while in flight; the reset already
			// cleared the loading flag and replaced the items.
			debug!("Discarding page fetched for a superseded feed");
			return LoadOutcome::Skipped;
		}
		state.loading = false;

		let outcome = match result {
			Ok(page) => {
				let appended = page.items.len();
				state.items.extend(page.items);
				state.cursor = page.cursor;
				state.is_last = page.is_last;
				state.error = None;
				LoadOutcome::Loaded(appended)
			}
			Err(e) => {
				warn!("Feed page load failed for {}: {}", base_url, e);
				state.error = Some(e.to_string());
				LoadOutcome::Failed
			}
		};
		self.publish(&state);
		outcome
	}

	/// Discards all accumulated state and restarts from a fresh
	/// initial page, under a possibly different kind filter. Any
	/// request still in flight is superseded and its result dropped.
	pub async fn reset(
		&self,
		base_url: impl Into<String>,
		kinds: Vec<TransactionKind>,
		initial: FeedPage,
	) {
		let mut state = self.state.lock().await;
		state.epoch += 1;
		state.base_url = base_url.into();
		state.kinds = kinds;
		state.items = initial.items;
		state.cursor = initial.cursor;
		state.is_last = initial.is_last;
		state.loading = false;
		state.error = None;
		self.publish(&state);
	}

	fn publish(&self, state: &FetcherState) {
		// send_replace stores the snapshot even with no subscribers,
		// so a later subscribe() starts from the current state.
		self.snapshot_tx.send_replace(state.snapshot());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use explorer_client::{ClientError, CoreInfo, TransactionListResponse};
	use explorer_types::TransactionStatus;
	use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
	use tokio::sync::Semaphore;

	const NET_A: &str = "https://api.mainnet.example";
	const NET_B: &str = "https://custom.example";

	fn tx(id: String, order_key: u64) -> Transaction {
		Transaction {
			id,
			kind: TransactionKind::ContractCall,
			status: TransactionStatus::Confirmed,
			order_key,
		}
	}

	/// Serves a fixed number of transactions per base URL, ids
	/// prefixed with the host so cross-network mixing is detectable.
	struct ScriptedApi {
		total: u64,
		calls: AtomicUsize,
		fail_next: AtomicBool,
		gate: Semaphore,
		seen_kinds: std::sync::Mutex<Vec<Vec<TransactionKind>>>,
	}

	impl ScriptedApi {
		fn with_total(total: u64) -> Self {
			Self {
				total,
				calls: AtomicUsize::new(0),
				fail_next: AtomicBool::new(false),
				gate: Semaphore::new(Semaphore::MAX_PERMITS),
				seen_kinds: std::sync::Mutex::new(Vec::new()),
			}
		}

		fn gated(total: u64) -> Self {
			Self {
				gate: Semaphore::new(0),
				..Self::with_total(total)
			}
		}

		fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}

		fn page(&self, base_url: &str, request: &PageRequest) -> FeedPage {
			let offset = request.cursor.offset();
			let end = (offset + request.limit as u64).min(self.total);
			TransactionListResponse {
				limit: request.limit,
				offset,
				total: self.total,
				results: (offset..end)
					.map(|i| tx(format!("{base_url}#{i}"), self.total - i))
					.collect(),
			}
			.into_page()
		}
	}

	#[async_trait]
	impl IndexerApi for ScriptedApi {
		async fn core_info(&self, _base_url: &str) -> Result<CoreInfo, ClientError> {
			unimplemented!("fetchers never probe")
		}

		async fn transactions(
			&self,
			base_url: &str,
			request: &PageRequest,
		) -> Result<FeedPage, ClientError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.seen_kinds
				.lock()
				.unwrap()
				.push(request.kinds.clone());
			let permit = self.gate.acquire().await.expect("gate open");
			permit.forget();
			if self.fail_next.swap(false, Ordering::SeqCst) {
				return Err(ClientError::Unreachable("connection reset".into()));
			}
			Ok(self.page(base_url, request))
		}

		async fn mempool_transactions(
			&self,
			base_url: &str,
			request: &PageRequest,
		) -> Result<FeedPage, ClientError> {
			self.transactions(base_url, request).await
		}
	}

	fn fetcher(api: Arc<ScriptedApi>, initial: FeedPage) -> PaginatedFetcher {
		PaginatedFetcher::new(api, NET_A, 25, vec![], false, initial)
	}

	#[tokio::test]
	async fn pages_concatenate_in_cursor_order_until_the_end() {
		let api = Arc::new(ScriptedApi::with_total(50));
		let fetcher = fetcher(api.clone(), FeedPage::empty());

		assert_eq!(fetcher.load_more().await, LoadOutcome::Loaded(25));
		let snapshot = fetcher.snapshot().await;
		assert_eq!(snapshot.items.len(), 25);
		assert!(!snapshot.is_reaching_end);

		assert_eq!(fetcher.load_more().await, LoadOutcome::Loaded(25));
		let snapshot = fetcher.snapshot().await;
		assert_eq!(snapshot.items.len(), 50);
		assert!(snapshot.is_reaching_end);

		// No gaps, no duplicates.
		let ids: Vec<_> = snapshot.items.iter().map(|t| t.id.clone()).collect();
		let expected: Vec<_> = (0..50).map(|i| format!("{NET_A}#{i}")).collect();
		assert_eq!(ids, expected);

		// Terminal state: further calls are no-ops.
		assert_eq!(fetcher.load_more().await, LoadOutcome::Skipped);
		assert_eq!(api.calls(), 2);
	}

	#[tokio::test]
	async fn load_more_is_a_noop_while_a_request_is_in_flight() {
		let api = Arc::new(ScriptedApi::gated(50));
		let fetcher = Arc::new(fetcher(api.clone(), FeedPage::empty()));

		let first = tokio::spawn({
			let fetcher = fetcher.clone();
			async move { fetcher.load_more().await }
		});
		tokio::time::sleep(std::time::Duration::from_millis(20)).await;

		assert_eq!(fetcher.load_more().await, LoadOutcome::Skipped);
		let snapshot = fetcher.snapshot().await;
		assert!(snapshot.is_loading_more);
		assert!(snapshot.items.is_empty());

		api.gate.add_permits(1);
		assert_eq!(first.await.unwrap(), LoadOutcome::Loaded(25));
		assert_eq!(api.calls(), 1);
	}

	#[tokio::test]
	async fn failure_keeps_items_and_is_retryable() {
		let api = Arc::new(ScriptedApi::with_total(50));
		let fetcher = fetcher(api.clone(), FeedPage::empty());

		assert_eq!(fetcher.load_more().await, LoadOutcome::Loaded(25));

		api.fail_next.store(true, Ordering::SeqCst);
		assert_eq!(fetcher.load_more().await, LoadOutcome::Failed);
		let snapshot = fetcher.snapshot().await;
		assert_eq!(snapshot.items.len(), 25);
		assert!(snapshot.error.is_some());

		// The retry picks up from the same cursor.
		assert_eq!(fetcher.load_more().await, LoadOutcome::Loaded(25));
		let snapshot = fetcher.snapshot().await;
		assert_eq!(snapshot.items.len(), 50);
		assert!(snapshot.error.is_none());
	}

	#[tokio::test]
	async fn reset_replaces_items_with_the_fresh_initial_page() {
		let api = Arc::new(ScriptedApi::with_total(50));
		let fetcher = fetcher(api.clone(), FeedPage::empty());
		fetcher.load_more().await;
		let before: Vec<_> = fetcher
			.snapshot()
			.await
			.items
			.iter()
			.map(|t| t.id.clone())
			.collect();

		let initial = api.page(NET_B, &PageRequest::first(25, vec![]));
		fetcher.reset(NET_B, vec![], initial).await;
		fetcher.load_more().await;

		let after: Vec<_> = fetcher
			.snapshot()
			.await
			.items
			.iter()
			.map(|t| t.id.clone())
			.collect();
		assert_eq!(after.len(), 50);
		assert!(before.iter().all(|id| !after.contains(id)));
	}

	#[tokio::test]
	async fn filter_switch_discards_items_and_refetches_with_new_kinds() {
		let api = Arc::new(ScriptedApi::with_total(75));
		let fetcher = fetcher(api.clone(), FeedPage::empty());
		fetcher.load_more().await;
		assert_eq!(fetcher.snapshot().await.items.len(), 25);

		let narrowed = vec![TransactionKind::TokenTransfer];
		fetcher.reset(NET_A, narrowed.clone(), FeedPage::empty()).await;

		let snapshot = fetcher.snapshot().await;
		assert!(snapshot.items.is_empty());
		assert_eq!(fetcher.kinds().await, narrowed);

		// The next request restarts from the first page and carries
		// the narrowed filter.
		fetcher.load_more().await;
		assert_eq!(fetcher.snapshot().await.items.len(), 25);
		let seen = api.seen_kinds.lock().unwrap();
		assert_eq!(*seen, vec![vec![], narrowed]);
	}

	#[tokio::test]
	async fn in_flight_response_is_discarded_after_reset() {
		let api = Arc::new(ScriptedApi::gated(50));
		let fetcher = Arc::new(fetcher(api.clone(), FeedPage::empty()));

		let stale = tokio::spawn({
			let fetcher = fetcher.clone();
			async move { fetcher.load_more().await }
		});
		tokio::time::sleep(std::time::Duration::from_millis(20)).await;

		fetcher.reset(NET_B, vec![], FeedPage::empty()).await;
		api.gate.add_permits(1);
		assert_eq!(stale.await.unwrap(), LoadOutcome::Skipped);

		let snapshot = fetcher.snapshot().await;
		assert!(snapshot.items.is_empty());
		assert!(!snapshot.is_loading_more);
	}

	#[tokio::test]
	async fn observers_see_every_state_change() {
		let api = Arc::new(ScriptedApi::with_total(25));
		let fetcher = fetcher(api, FeedPage::empty());
		let mut updates = fetcher.subscribe();

		fetcher.load_more().await;
		updates.changed().await.unwrap();
		let latest = updates.borrow_and_update().clone();
		assert_eq!(latest.items.len(), 25);
		assert!(latest.is_reaching_end);
	}
}
