//! First-paint data for the transaction feeds.
//!
//! The hosting layer supplies the first page of each feed so the
//! initial render needs no further round trip; the feed core treats
//! these pages exactly like client-fetched ones.

use explorer_client::{ClientError, IndexerApi, PageRequest};
use explorer_types::{FeedPage, TransactionKind};

pub struct BootstrapPages {
	pub confirmed: FeedPage,
	pub pending: FeedPage,
}

/// Fetches the initial confirmed and mempool pages concurrently.
pub async fn fetch_initial_pages(
	api: &dyn IndexerApi,
	base_url: &str,
	bootstrap_limit: u32,
	page_limit: u32,
	kinds: &[TransactionKind],
) -> Result<BootstrapPages, ClientError> {
	let confirmed_request = PageRequest::first(bootstrap_limit, kinds.to_vec());
	let pending_request = PageRequest::first(page_limit, kinds.to_vec());

	let (confirmed, pending) = tokio::join!(
		api.transactions(base_url, &confirmed_request),
		api.mempool_transactions(base_url, &pending_request),
	);

	Ok(BootstrapPages {
		confirmed: confirmed?,
		pending: pending?,
	})
}
