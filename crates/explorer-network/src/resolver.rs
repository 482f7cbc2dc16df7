//! Chain identity resolution with a single-flight cache.
//!
//! The resolver answers "what chain does this URL serve, and is it
//! alive?" without ever blocking its callers on one another. Results
//! are cached per normalized URL; entries older than the staleness
//! window are refreshed in place, never aged out. Concurrent
//! `resolve` calls for the same URL share one in-flight probe.

use explorer_client::IndexerApi;
use explorer_types::{ChainId, ChainMode, CHAIN_ID_MAINNET, CHAIN_ID_TESTNET};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(60);

/// Outcome of resolving one URL, as presentation consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStatus {
	/// A probe is in flight and nothing is cached yet.
	Pending,
	/// The info endpoint answered; the chain id is classified into a
	/// mode (an unrecognized id is `Unknown` but still usable).
	Resolved { chain_id: ChainId, mode: ChainMode },
	/// The probe failed: network error, non-2xx, or malformed body.
	Errored(String),
}

impl ResolutionStatus {
	pub fn chain_mode(&self) -> Option<ChainMode> {
		match self {
			ResolutionStatus::Resolved { mode, .. } => Some(*mode),
			_ => None,
		}
	}

	/// Pending and errored networks render as disabled/offline.
	pub fn is_disabled(&self) -> bool {
		!matches!(self, ResolutionStatus::Resolved { .. })
	}
}

struct CachedResolution {
	status: ResolutionStatus,
	fetched_at: Instant,
}

#[derive(Default)]
struct Slot {
	cached: Option<CachedResolution>,
	in_flight: Option<watch::Receiver<Option<ResolutionStatus>>>,
}

enum FlightPlan {
	Done(ResolutionStatus),
	Wait(watch::Receiver<Option<ResolutionStatus>>),
	Probe(watch::Sender<Option<ResolutionStatus>>),
}

/// Per-URL chain identity resolver.
///
/// Built-in mainnet/testnet URLs resolve statically and are never
/// probed; everything else goes through the cache.
pub struct NetworkResolver {
	api: Arc<dyn IndexerApi>,
	mainnet_url: String,
	testnet_url: String,
	stale_after: Duration,
	slots: Mutex<HashMap<String, Slot>>,
}

impl NetworkResolver {
	pub fn new(
		api: Arc<dyn IndexerApi>,
		mainnet_url: impl Into<String>,
		testnet_url: impl Into<String>,
	) -> Self {
		Self {
			api,
			mainnet_url: mainnet_url.into(),
			testnet_url: testnet_url.into(),
			stale_after: DEFAULT_STALE_AFTER,
			slots: Mutex::new(HashMap::new()),
		}
	}

	pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
		self.stale_after = stale_after;
		self
	}

	fn static_resolution(&self, url: &str) -> Option<ResolutionStatus> {
		if url == self.mainnet_url {
			return Some(ResolutionStatus::Resolved {
				chain_id: CHAIN_ID_MAINNET,
				mode: ChainMode::Mainnet,
			});
		}
		if url == self.testnet_url {
			return Some(ResolutionStatus::Resolved {
				chain_id: CHAIN_ID_TESTNET,
				mode: ChainMode::Testnet,
			});
		}
		None
	}

	/// Resolves a URL, probing at most once regardless of how many
	/// callers ask concurrently. Returns `Resolved` or `Errored`;
	/// `Pending` is only ever observed through [`Self::peek`].
	pub async fn resolve(&self, url: &str) -> ResolutionStatus {
		if let Some(status) = self.static_resolution(url) {
			return status;
		}

		loop {
			let plan = {
				let mut slots = self.slots.lock().await;
				let slot = slots.entry(url.to_string()).or_default();

				if let Some(rx) = &slot.in_flight {
					FlightPlan::Wait(rx.clone())
				} else if let Some(cached) = &slot.cached {
					if cached.fetched_at.elapsed() < self.stale_after {
						FlightPlan::Done(cached.status.clone())
					} else {
						self.begin_probe(slot)
					}
				} else {
					self.begin_probe(slot)
				}
			};

			match plan {
				FlightPlan::Done(status) => return status,
				FlightPlan::Probe(tx) => return self.probe(url, tx).await,
				FlightPlan::Wait(mut rx) => {
					loop {
						if let Some(status) = rx.borrow().clone() {
							return status;
						}
						if rx.changed().await.is_err() {
							// The probing future was dropped before it
							// finished; clear the dead flight and retry.
							let mut slots = self.slots.lock().await;
							if let Some(slot) = slots.get_mut(url) {
								let dead = slot
									.in_flight
									.as_ref()
									.is_some_and(|cur| cur.has_changed().is_err());
								if dead {
									slot.in_flight = None;
								}
							}
							break;
						}
					}
				}
			}
		}
	}

	fn begin_probe(&self, slot: &mut Slot) -> FlightPlan {
		let (tx, rx) = watch::channel(None);
		slot.in_flight = Some(rx);
		FlightPlan::Probe(tx)
	}

	async fn probe(
		&self,
		url: &str,
		tx: watch::Sender<Option<ResolutionStatus>>,
	) -> ResolutionStatus {
		debug!("Probing network {}", url);

		let status = match self.api.core_info(url).await {
			Ok(info) => ResolutionStatus::Resolved {
				chain_id: info.network_id,
				mode: ChainMode::from_chain_id(info.network_id),
			},
			Err(e) => {
				warn!("Network {} unreachable: {}", url, e);
				ResolutionStatus::Errored(e.to_string())
			}
		};

		let mut slots = self.slots.lock().await;
		let slot = slots.entry(url.to_string()).or_default();
		slot.cached = Some(CachedResolution {
			status: status.clone(),
			fetched_at: Instant::now(),
		});
		slot.in_flight = None;
		drop(slots);

		let _ = tx.send(Some(status.clone()));
		status
	}

	/// Cached or in-flight status without triggering a probe. A stale
	/// cached value is still served here while a refresh runs.
	pub async fn peek(&self, url: &str) -> Option<ResolutionStatus> {
		if let Some(status) = self.static_resolution(url) {
			return Some(status);
		}
		let slots = self.slots.lock().await;
		let slot = slots.get(url)?;
		if let Some(cached) = &slot.cached {
			return Some(cached.status.clone());
		}
		if slot.in_flight.is_some() {
			return Some(ResolutionStatus::Pending);
		}
		None
	}

	/// Evicts the cache entry for a URL (used when a custom network
	/// is removed).
	pub async fn invalidate(&self, url: &str) {
		self.slots.lock().await.remove(url);
	}
}
