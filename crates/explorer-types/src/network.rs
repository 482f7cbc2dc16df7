//! Network identity and chain classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chain identifier as reported by a node's info endpoint.
pub type ChainId = u64;

/// Chain id the mainnet reports.
pub const CHAIN_ID_MAINNET: ChainId = 1;
/// Chain id the testnet reports.
pub const CHAIN_ID_TESTNET: ChainId = 2;

/// Classification of a network once its chain id is known.
///
/// Ids outside the recognized table classify as [`ChainMode::Unknown`];
/// an unknown mode is still a usable network, it just carries no badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainMode {
	Mainnet,
	Testnet,
	Unknown,
}

impl ChainMode {
	/// Maps a reported chain id onto a mode.
	pub fn from_chain_id(id: ChainId) -> Self {
		match id {
			CHAIN_ID_MAINNET => ChainMode::Mainnet,
			CHAIN_ID_TESTNET => ChainMode::Testnet,
			_ => ChainMode::Unknown,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ChainMode::Mainnet => "mainnet",
			ChainMode::Testnet => "testnet",
			ChainMode::Unknown => "unknown",
		}
	}
}

impl fmt::Display for ChainMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One configured API endpoint the explorer can point at.
///
/// The chain mode is deliberately not stored here: it is resolved
/// lazily by the network resolver and cached per URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkIdentity {
	/// Canonical base endpoint, normalized, no trailing slash.
	pub url: String,
	/// Human-readable name shown in the network switcher.
	pub label: String,
	/// True for user-added endpoints; built-ins are never removable.
	pub is_custom: bool,
	/// Statically known subnet classification.
	pub is_subnet: bool,
}

impl NetworkIdentity {
	/// A protected built-in network (mainnet or testnet).
	pub fn builtin(url: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			label: label.into(),
			is_custom: false,
			is_subnet: false,
		}
	}

	/// A user-added network.
	pub fn custom(url: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			label: label.into(),
			is_custom: true,
			is_subnet: false,
		}
	}

	/// A subnet endpoint; subnets never carry a chain-mode badge.
	pub fn subnet(url: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			label: label.into(),
			is_custom: true,
			is_subnet: true,
		}
	}
}
