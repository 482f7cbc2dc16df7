//! Shared data model for the explorer core.
//!
//! These types are consumed by every other crate in the workspace:
//! network identities and chain classification, the transaction
//! record as the feed layer sees it, and the page/cursor types used
//! by the paginated fetchers.

pub mod network;
pub mod transaction;

pub use network::*;
pub use transaction::*;
