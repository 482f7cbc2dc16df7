//! Configuration types with serde defaults.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerConfig {
	#[serde(default)]
	pub explorer: ExplorerSettings,
	pub networks: NetworksConfig,
	#[serde(default)]
	pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerSettings {
	#[serde(default = "default_name")]
	pub name: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

impl Default for ExplorerSettings {
	fn default() -> Self {
		Self {
			name: default_name(),
			log_level: default_log_level(),
		}
	}
}

/// Endpoints of the built-in networks plus optional extra seeds: a
/// local devnet and a subnet endpoint, both removable custom
/// networks. Subnets never carry a chain-mode badge.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworksConfig {
	pub mainnet_api_url: String,
	pub testnet_api_url: String,
	#[serde(default)]
	pub devnet_api_url: Option<String>,
	#[serde(default)]
	pub subnet_api_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
	/// Per-request transport timeout; a timeout is an ordinary
	/// request failure.
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,
	/// Page size for incremental feed loads.
	#[serde(default = "default_page_limit")]
	pub page_limit: u32,
	/// Size of the server-supplied first confirmed page.
	#[serde(default = "default_bootstrap_limit")]
	pub bootstrap_limit: u32,
	/// Resolution-cache staleness window.
	#[serde(default = "default_resolution_stale_secs")]
	pub resolution_stale_secs: u64,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			request_timeout_ms: default_request_timeout_ms(),
			page_limit: default_page_limit(),
			bootstrap_limit: default_bootstrap_limit(),
			resolution_stale_secs: default_resolution_stale_secs(),
		}
	}
}

fn default_name() -> String {
	"explorer-core".to_string()
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_request_timeout_ms() -> u64 {
	10_000
}

fn default_page_limit() -> u32 {
	25
}

fn default_bootstrap_limit() -> u32 {
	50
}

fn default_resolution_stale_secs() -> u64 {
	60
}
