//! Composition of the confirmed and mempool feeds.

use crate::fetcher::{FeedSnapshot, LoadOutcome, PaginatedFetcher};
use explorer_client::IndexerApi;
use explorer_types::{FeedPage, TransactionKind};
use std::collections::HashSet;
use std::sync::Arc;

/// Output of [`TransactionFeedMerger::view`]: two ordered sections
/// with their own loading/error/reaching-end flags, kept separate so
/// the UI can show per-section load-more affordances.
#[derive(Debug, Clone)]
pub struct MergedFeedView {
	pub confirmed: FeedSnapshot,
	pub pending: FeedSnapshot,
}

/// One logical "recent transactions" feed over two independently
/// paginated sources.
///
/// The two fetchers never interleave cursors; the only coupling is
/// the shared kind filter and the render-time rule that a pending
/// item disappears once its id shows up in the confirmed section.
pub struct TransactionFeedMerger {
	confirmed: Arc<PaginatedFetcher>,
	pending: Arc<PaginatedFetcher>,
}

impl TransactionFeedMerger {
	pub fn new(
		api: Arc<dyn IndexerApi>,
		base_url: impl Into<String>,
		limit: u32,
		kinds: Vec<TransactionKind>,
		confirmed_page: FeedPage,
		pending_page: FeedPage,
	) -> Self {
		let base_url = base_url.into();
		Self {
			confirmed: Arc::new(PaginatedFetcher::new(
				api.clone(),
				base_url.clone(),
				limit,
				kinds.clone(),
				false,
				confirmed_page,
			)),
			pending: Arc::new(PaginatedFetcher::new(
				api,
				base_url,
				limit,
				kinds,
				true,
				pending_page,
			)),
		}
	}

	pub fn confirmed(&self) -> &Arc<PaginatedFetcher> {
		&self.confirmed
	}

	pub fn pending(&self) -> &Arc<PaginatedFetcher> {
		&self.pending
	}

	pub async fn load_more_confirmed(&self) -> LoadOutcome {
		self.confirmed.load_more().await
	}

	pub async fn load_more_pending(&self) -> LoadOutcome {
		self.pending.load_more().await
	}

	/// Resets both sections for a new network or kind filter, each
	/// from its fresh caller-supplied initial page. The filter stays
	/// shared between the sections.
	pub async fn reset(
		&self,
		base_url: &str,
		kinds: Vec<TransactionKind>,
		confirmed_page: FeedPage,
		pending_page: FeedPage,
	) {
		tokio::join!(
			self.confirmed.reset(base_url, kinds.clone(), confirmed_page),
			self.pending.reset(base_url, kinds, pending_page),
		);
	}

	/// The merged view. A pending item whose id has been observed in
	/// the confirmed section is dropped here, on every render; no
	/// item ever appears twice within one logical view.
	pub async fn view(&self) -> MergedFeedView {
		let confirmed = self.confirmed.snapshot().await;
		let mut pending = self.pending.snapshot().await;

		let confirmed_ids: HashSet<&str> =
			confirmed.items.iter().map(|t| t.id.as_str()).collect();
		pending
			.items
			.retain(|t| !confirmed_ids.contains(t.id.as_str()));

		MergedFeedView { confirmed, pending }
	}
}
