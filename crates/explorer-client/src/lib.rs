//! Transport seam between the explorer core and the indexing API.
//!
//! Every component that talks to a network does so through the
//! [`IndexerApi`] trait, so the resolver and feed crates can be
//! exercised against in-process mocks. The only production
//! implementation is [`HttpIndexerApi`] on reqwest.

use async_trait::async_trait;
use explorer_types::{FeedPage, PageCursor, TransactionKind};
use thiserror::Error;

pub mod http;
pub mod wire;

pub use http::HttpIndexerApi;
pub use wire::{CoreInfo, TransactionListResponse};

/// Errors a transport can produce.
///
/// These are never surfaced to presentation directly; the resolver
/// and fetchers fold them into their own errored state (retry by
/// re-invoking the operation).
#[derive(Debug, Error)]
pub enum ClientError {
	/// Request failed to complete (connect error, timeout, DNS).
	#[error("network unreachable: {0}")]
	Unreachable(String),

	/// Server answered with a non-2xx status.
	#[error("unexpected status {0}")]
	Status(u16),

	/// Body did not match the expected shape.
	#[error("malformed response: {0}")]
	Malformed(String),
}

/// Parameters for one page of a transaction list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
	pub cursor: PageCursor,
	pub limit: u32,
	/// Kind allow-list; empty means no filter.
	pub kinds: Vec<TransactionKind>,
}

impl PageRequest {
	pub fn first(limit: u32, kinds: Vec<TransactionKind>) -> Self {
		Self {
			cursor: PageCursor::start(),
			limit,
			kinds,
		}
	}
}

/// Read-only surface of the remote indexing API.
#[async_trait]
pub trait IndexerApi: Send + Sync {
	/// Liveness/identity probe for a base URL.
	async fn core_info(&self, base_url: &str) -> Result<CoreInfo, ClientError>;

	/// One page of confirmed transactions, newest first.
	async fn transactions(
		&self,
		base_url: &str,
		request: &PageRequest,
	) -> Result<FeedPage, ClientError>;

	/// One page of mempool (pending) transactions, newest first.
	async fn mempool_transactions(
		&self,
		base_url: &str,
		request: &PageRequest,
	) -> Result<FeedPage, ClientError>;
}
