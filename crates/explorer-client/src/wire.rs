//! Wire shapes of the indexing API responses.

use explorer_types::{ChainId, FeedPage, PageCursor, Transaction};
use serde::Deserialize;

/// Payload of the info endpoint, trimmed to the fields the core
/// reads. `network_id` is the only required one.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreInfo {
	pub network_id: ChainId,
	#[serde(default)]
	pub chain_tip_height: Option<u64>,
	#[serde(default)]
	pub server_version: Option<String>,
}

/// Payload of the transaction list and mempool list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionListResponse {
	pub limit: u32,
	pub offset: u64,
	pub total: u64,
	pub results: Vec<Transaction>,
}

impl TransactionListResponse {
	/// Converts the offset/total bookkeeping into a [`FeedPage`],
	/// deriving the continuation cursor and the end-of-feed flag.
	pub fn into_page(self) -> FeedPage {
		let cursor = PageCursor(self.offset).advanced_by(self.results.len());
		let is_last = cursor.offset() >= self.total;
		FeedPage {
			items: self.results,
			cursor,
			is_last,
		}
	}
}
