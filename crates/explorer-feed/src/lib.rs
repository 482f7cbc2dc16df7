//! Incremental transaction feeds.
//!
//! [`PaginatedFetcher`] is the generic cursor-based loader over one
//! collection endpoint; [`TransactionFeedMerger`] composes two of
//! them (confirmed + mempool) into the single "recent transactions"
//! experience with independent load-more controls and a shared kind
//! filter.

pub mod fetcher;
pub mod merger;

pub use fetcher::{FeedSnapshot, LoadOutcome, PaginatedFetcher};
pub use merger::{MergedFeedView, TransactionFeedMerger};
