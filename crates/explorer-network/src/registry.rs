//! Registry of known networks and the active selection.
//!
//! The registry itself is not thread-safe; [`crate::ExplorerContext`]
//! wraps it in a `tokio::sync::RwLock` for shared use. Built-in
//! mainnet/testnet entries are protected: they can never be removed,
//! and neither can whichever network is currently active.

use explorer_types::NetworkIdentity;
use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Debug, Error)]
pub enum RegistryError {
	#[error("network already registered: {0}")]
	DuplicateNetwork(String),

	#[error("network is protected: {0}")]
	ProtectedNetwork(String),

	#[error("network not registered: {0}")]
	UnknownNetwork(String),

	#[error("invalid network url: {0}")]
	InvalidUrl(String),
}

/// Canonicalizes a user-supplied endpoint: must parse as http(s),
/// comes back trimmed with no trailing slash. All registry and cache
/// keys go through this.
pub fn normalize_url(raw: &str) -> Result<String, RegistryError> {
	let trimmed = raw.trim();
	let parsed =
		Url::parse(trimmed).map_err(|e| RegistryError::InvalidUrl(format!("{trimmed}: {e}")))?;
	match parsed.scheme() {
		"http" | "https" => {}
		other => {
			return Err(RegistryError::InvalidUrl(format!(
				"{trimmed}: unsupported scheme \"{other}\""
			)))
		}
	}
	Ok(trimmed.trim_end_matches('/').to_string())
}

/// The set of configured networks plus the single active selection.
pub struct NetworkRegistry {
	networks: Vec<NetworkIdentity>,
	active_url: String,
}

impl NetworkRegistry {
	/// Creates a registry seeded with the protected built-ins; the
	/// mainnet entry starts active.
	pub fn new(mainnet_url: &str, testnet_url: &str) -> Result<Self, RegistryError> {
		let mainnet = normalize_url(mainnet_url)?;
		let testnet = normalize_url(testnet_url)?;
		if mainnet == testnet {
			return Err(RegistryError::DuplicateNetwork(testnet));
		}
		Ok(Self {
			active_url: mainnet.clone(),
			networks: vec![
				NetworkIdentity::builtin(mainnet, "Mainnet"),
				NetworkIdentity::builtin(testnet, "Testnet"),
			],
		})
	}

	pub fn networks(&self) -> &[NetworkIdentity] {
		&self.networks
	}

	pub fn find(&self, url: &str) -> Option<&NetworkIdentity> {
		self.networks.iter().find(|n| n.url == url)
	}

	/// The currently active network.
	pub fn active(&self) -> &NetworkIdentity {
		// Invariant: active_url always names a registered network.
		self.networks
			.iter()
			.find(|n| n.url == self.active_url)
			.expect("active network is registered")
	}

	/// True for the protected built-in entries.
	pub fn is_default(&self, url: &str) -> bool {
		self.networks
			.iter()
			.any(|n| !n.is_custom && n.url == url)
	}

	/// Registers a pre-built identity (devnet seeding, subnets). The
	/// identity's URL is normalized before the duplicate check.
	pub fn register(&mut self, mut identity: NetworkIdentity) -> Result<&NetworkIdentity, RegistryError> {
		identity.url = normalize_url(&identity.url)?;
		if self.find(&identity.url).is_some() {
			return Err(RegistryError::DuplicateNetwork(identity.url));
		}
		info!("Registering network {} ({})", identity.label, identity.url);
		self.networks.push(identity);
		Ok(self.networks.last().expect("just pushed"))
	}

	/// Adds a user-supplied custom network.
	pub fn add_custom_network(
		&mut self,
		url: &str,
		label: &str,
	) -> Result<&NetworkIdentity, RegistryError> {
		self.register(NetworkIdentity::custom(url, label))
	}

	/// Removes a custom network and returns it so the caller can
	/// evict its cached resolution. Built-ins and the active network
	/// are protected.
	pub fn remove_custom_network(&mut self, url: &str) -> Result<NetworkIdentity, RegistryError> {
		let url = normalize_url(url)?;
		let position = self
			.networks
			.iter()
			.position(|n| n.url == url)
			.ok_or_else(|| RegistryError::UnknownNetwork(url.clone()))?;

		if !self.networks[position].is_custom || url == self.active_url {
			return Err(RegistryError::ProtectedNetwork(url));
		}

		let removed = self.networks.remove(position);
		info!("Removed network {} ({})", removed.label, removed.url);
		Ok(removed)
	}

	/// Switches the active network. Dependent feeds observe the
	/// switch through [`crate::ExplorerContext`] and must reset.
	pub fn set_active(&mut self, url: &str) -> Result<&NetworkIdentity, RegistryError> {
		let url = normalize_url(url)?;
		if self.find(&url).is_none() {
			return Err(RegistryError::UnknownNetwork(url));
		}
		info!("Switching active network to {}", url);
		self.active_url = url;
		Ok(self.active())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn registry() -> NetworkRegistry {
		NetworkRegistry::new("https://api.mainnet.example", "https://api.testnet.example")
			.unwrap()
	}

	#[test]
	fn seeds_builtins_with_mainnet_active() {
		let registry = registry();
		assert_eq!(registry.networks().len(), 2);
		assert_eq!(registry.active().label, "Mainnet");
		assert!(registry.is_default("https://api.mainnet.example"));
	}

	#[test]
	fn normalization_strips_trailing_slash() {
		assert_eq!(
			normalize_url(" https://custom.example/v2/ ").unwrap(),
			"https://custom.example/v2"
		);
	}

	#[test]
	fn normalization_rejects_non_http_schemes() {
		assert!(matches!(
			normalize_url("ftp://custom.example"),
			Err(RegistryError::InvalidUrl(_))
		));
		assert!(matches!(
			normalize_url("not a url"),
			Err(RegistryError::InvalidUrl(_))
		));
	}

	#[test]
	fn duplicate_detection_applies_after_normalization() {
		let mut registry = registry();
		registry
			.add_custom_network("https://custom.example", "Custom")
			.unwrap();

		let result = registry.add_custom_network("https://custom.example/", "Custom again");
		assert!(matches!(result, Err(RegistryError::DuplicateNetwork(_))));
	}

	#[test]
	fn builtins_are_protected_from_removal() {
		let mut registry = registry();
		let result = registry.remove_custom_network("https://api.testnet.example");
		assert!(matches!(result, Err(RegistryError::ProtectedNetwork(_))));
	}

	#[test]
	fn active_network_is_protected_from_removal() {
		let mut registry = registry();
		registry
			.add_custom_network("https://custom.example", "Custom")
			.unwrap();
		registry.set_active("https://custom.example").unwrap();

		let result = registry.remove_custom_network("https://custom.example");
		assert!(matches!(result, Err(RegistryError::ProtectedNetwork(_))));
	}

	#[test]
	fn inactive_custom_network_can_be_removed() {
		let mut registry = registry();
		registry
			.add_custom_network("https://custom.example", "Custom")
			.unwrap();

		let removed = registry
			.remove_custom_network("https://custom.example")
			.unwrap();
		assert_eq!(removed.label, "Custom");
		assert_eq!(registry.networks().len(), 2);
	}

	#[test]
	fn subnet_seeds_register_as_removable_customs() {
		let mut registry = registry();
		let subnet = registry
			.register(NetworkIdentity::subnet("https://subnet.example/", "Subnet"))
			.unwrap()
			.clone();
		assert!(subnet.is_subnet);
		assert!(subnet.is_custom);
		assert_eq!(subnet.url, "https://subnet.example");

		let removed = registry
			.remove_custom_network("https://subnet.example")
			.unwrap();
		assert!(removed.is_subnet);
	}

	#[test]
	fn set_active_rejects_unregistered_urls() {
		let mut registry = registry();
		let result = registry.set_active("https://nowhere.example");
		assert!(matches!(result, Err(RegistryError::UnknownNetwork(_))));
	}
}
