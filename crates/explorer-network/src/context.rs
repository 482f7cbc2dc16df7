//! Explicit application state shared by network-aware components.

use crate::registry::{NetworkRegistry, RegistryError};
use crate::resolver::NetworkResolver;
use explorer_types::NetworkIdentity;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

/// Wires the registry and resolver together and publishes
/// active-network changes. Passed explicitly into whatever needs it;
/// replaces the ambient global context of a browser app.
pub struct ExplorerContext {
	registry: RwLock<NetworkRegistry>,
	resolver: Arc<NetworkResolver>,
	active_tx: watch::Sender<NetworkIdentity>,
}

impl ExplorerContext {
	pub fn new(registry: NetworkRegistry, resolver: Arc<NetworkResolver>) -> Self {
		let (active_tx, _) = watch::channel(registry.active().clone());
		Self {
			registry: RwLock::new(registry),
			resolver,
			active_tx,
		}
	}

	pub fn resolver(&self) -> &Arc<NetworkResolver> {
		&self.resolver
	}

	pub async fn networks(&self) -> Vec<NetworkIdentity> {
		self.registry.read().await.networks().to_vec()
	}

	pub async fn active_network(&self) -> NetworkIdentity {
		self.registry.read().await.active().clone()
	}

	/// Observers receive the new active identity on every switch;
	/// dependent feeds must reset from a fresh initial page when it
	/// changes (that reset is the cancellation boundary for any
	/// request still in flight against the old network).
	pub fn subscribe_active(&self) -> watch::Receiver<NetworkIdentity> {
		self.active_tx.subscribe()
	}

	pub async fn add_custom_network(
		&self,
		url: &str,
		label: &str,
	) -> Result<NetworkIdentity, RegistryError> {
		let mut registry = self.registry.write().await;
		Ok(registry.add_custom_network(url, label)?.clone())
	}

	/// Removes a custom network and evicts its cached resolution.
	pub async fn remove_custom_network(
		&self,
		url: &str,
	) -> Result<NetworkIdentity, RegistryError> {
		let removed = self.registry.write().await.remove_custom_network(url)?;
		self.resolver.invalidate(&removed.url).await;
		Ok(removed)
	}

	pub async fn set_active_network(&self, url: &str) -> Result<NetworkIdentity, RegistryError> {
		// Published under the write lock so concurrent switches cannot
		// leave the channel advertising a different network than the
		// registry's active one.
		let mut registry = self.registry.write().await;
		let active = registry.set_active(url)?.clone();
		self.active_tx.send_replace(active.clone());
		Ok(active)
	}
}
