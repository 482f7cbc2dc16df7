//! Transaction records and feed pagination types.

use serde::{Deserialize, Serialize};

/// Transaction categories the feed layer filters on.
///
/// This is the full allow-list; the list endpoints accept any subset
/// of it as a `type` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
	SmartContract,
	ContractCall,
	TokenTransfer,
}

impl TransactionKind {
	/// Every kind, in the order the filter UI lists them.
	pub const ALL: [TransactionKind; 3] = [
		TransactionKind::SmartContract,
		TransactionKind::ContractCall,
		TransactionKind::TokenTransfer,
	];

	/// Wire name used in list-endpoint query strings.
	pub fn as_str(&self) -> &'static str {
		match self {
			TransactionKind::SmartContract => "smart_contract",
			TransactionKind::ContractCall => "contract_call",
			TransactionKind::TokenTransfer => "token_transfer",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
	/// Submitted, sitting in the mempool.
	Pending,
	/// Anchored in a block.
	Confirmed,
}

/// A transaction as the feed layer sees it.
///
/// Beyond the identity, kind and ordering keys the record is opaque;
/// presentation reads the rest straight off the API payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	#[serde(rename = "tx_id")]
	pub id: String,
	#[serde(rename = "tx_type")]
	pub kind: TransactionKind,
	#[serde(rename = "tx_status")]
	pub status: TransactionStatus,
	/// Arrival/confirmation ordering within a feed, newest first.
	pub order_key: u64,
}

/// Continuation point within one paginated collection.
///
/// The indexing API pages by offset; the cursor stays opaque to
/// everything above the client crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageCursor(pub u64);

impl PageCursor {
	pub fn start() -> Self {
		PageCursor(0)
	}

	/// Cursor after consuming `count` more items.
	pub fn advanced_by(&self, count: usize) -> Self {
		PageCursor(self.0 + count as u64)
	}

	pub fn offset(&self) -> u64 {
		self.0
	}
}

/// One page of a transaction feed, most-recent-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPage {
	pub items: Vec<Transaction>,
	/// Continuation token for the page after this one.
	pub cursor: PageCursor,
	/// True when the server signalled no further pages.
	pub is_last: bool,
}

impl FeedPage {
	/// An empty terminal-less page, used when no server-side
	/// bootstrap data is available.
	pub fn empty() -> Self {
		Self {
			items: Vec::new(),
			cursor: PageCursor::start(),
			is_last: false,
		}
	}
}
