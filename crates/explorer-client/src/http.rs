//! reqwest-backed implementation of [`IndexerApi`].

use crate::wire::{CoreInfo, TransactionListResponse};
use crate::{ClientError, IndexerApi, PageRequest};
use async_trait::async_trait;
use explorer_types::FeedPage;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client over the indexing API.
///
/// One instance is shared by every resolver and fetcher; per-network
/// routing happens through the `base_url` argument, so switching the
/// active network needs no new client.
#[derive(Debug, Clone)]
pub struct HttpIndexerApi {
	client: reqwest::Client,
	timeout: Duration,
}

impl Default for HttpIndexerApi {
	fn default() -> Self {
		Self::new(DEFAULT_TIMEOUT)
	}
}

impl HttpIndexerApi {
	pub fn new(timeout: Duration) -> Self {
		Self {
			client: reqwest::Client::new(),
			timeout,
		}
	}

	async fn get_json<T: DeserializeOwned>(
		&self,
		url: String,
		query: &[(&str, String)],
	) -> Result<T, ClientError> {
		debug!("GET {}", url);

		let response = self
			.client
			.get(&url)
			.query(query)
			.timeout(self.timeout)
			.send()
			.await
			.map_err(|e| ClientError::Unreachable(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			return Err(ClientError::Status(status.as_u16()));
		}

		response
			.json::<T>()
			.await
			.map_err(|e| ClientError::Malformed(e.to_string()))
	}

	async fn list_page(
		&self,
		url: String,
		request: &PageRequest,
	) -> Result<FeedPage, ClientError> {
		let response: TransactionListResponse =
			self.get_json(url, &list_query(request)).await?;
		Ok(response.into_page())
	}
}

fn list_query(request: &PageRequest) -> Vec<(&'static str, String)> {
	let mut query = vec![
		("limit", request.limit.to_string()),
		("offset", request.cursor.offset().to_string()),
	];
	for kind in &request.kinds {
		query.push(("type", kind.as_str().to_string()));
	}
	query
}

#[async_trait]
impl IndexerApi for HttpIndexerApi {
	async fn core_info(&self, base_url: &str) -> Result<CoreInfo, ClientError> {
		self.get_json(format!("{}/v2/info", base_url), &[]).await
	}

	async fn transactions(
		&self,
		base_url: &str,
		request: &PageRequest,
	) -> Result<FeedPage, ClientError> {
		self.list_page(format!("{}/extended/v1/tx", base_url), request)
			.await
	}

	async fn mempool_transactions(
		&self,
		base_url: &str,
		request: &PageRequest,
	) -> Result<FeedPage, ClientError> {
		self.list_page(format!("{}/extended/v1/tx/mempool", base_url), request)
			.await
	}
}
