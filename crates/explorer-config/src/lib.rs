//! Configuration loading with environment variable substitution.

use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub mod types;

pub use types::{ApiConfig, ExplorerConfig, ExplorerSettings, NetworksConfig};

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Builder-style loader: TOML file, `${VAR}` substitution, then
/// typed `EXPLORER_*` overrides.
#[derive(Default)]
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "EXPLORER_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<ExplorerConfig, ConfigError> {
		let Some(file_path) = &self.file_path else {
			return Err(ConfigError::FileNotFound(
				"No configuration file specified".to_string(),
			));
		};

		let mut config = self.load_from_file(file_path).await?;
		self.apply_env_overrides(&mut config)?;
		self.validate_config(&config)?;
		Ok(config)
	}

	async fn load_from_file(&self, file_path: &str) -> Result<ExplorerConfig, ConfigError> {
		let content = tokio::fs::read_to_string(file_path).await?;
		let substituted = self.substitute_env_vars(&content)?;
		toml::from_str(&substituted).map_err(|e| ConfigError::ParseError(e.to_string()))
	}

	fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
		let mut result = content.to_string();

		// Find and replace ${VAR_NAME} patterns
		let re = regex::Regex::new(r"\$\{([^}]+)\}").expect("valid pattern");

		for cap in re.captures_iter(content) {
			let full_match = &cap[0];
			let var_name = &cap[1];

			let env_value = env::var(var_name)
				.map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

			result = result.replace(full_match, &env_value);
		}

		Ok(result)
	}

	fn apply_env_overrides(&self, config: &mut ExplorerConfig) -> Result<(), ConfigError> {
		if let Ok(log_level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
			debug!("Overriding log level from environment");
			config.explorer.log_level = log_level;
		}

		if let Ok(timeout) = env::var(format!("{}REQUEST_TIMEOUT_MS", self.env_prefix)) {
			config.api.request_timeout_ms = timeout.parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid request timeout: {}", e))
			})?;
		}

		if let Ok(limit) = env::var(format!("{}PAGE_LIMIT", self.env_prefix)) {
			config.api.page_limit = limit
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid page limit: {}", e)))?;
		}

		Ok(())
	}

	fn validate_config(&self, config: &ExplorerConfig) -> Result<(), ConfigError> {
		let mut endpoints = vec![
			&config.networks.mainnet_api_url,
			&config.networks.testnet_api_url,
		];
		if let Some(devnet) = &config.networks.devnet_api_url {
			endpoints.push(devnet);
		}
		if let Some(subnet) = &config.networks.subnet_api_url {
			endpoints.push(subnet);
		}

		for endpoint in endpoints {
			let parsed = url::Url::parse(endpoint).map_err(|e| {
				ConfigError::ValidationError(format!("Invalid endpoint {}: {}", endpoint, e))
			})?;
			if !matches!(parsed.scheme(), "http" | "https") {
				return Err(ConfigError::ValidationError(format!(
					"Endpoint {} must be http(s)",
					endpoint
				)));
			}
		}

		if config.api.page_limit == 0 {
			return Err(ConfigError::ValidationError(
				"page_limit must be non-zero".to_string(),
			));
		}

		if config.api.request_timeout_ms == 0 {
			return Err(ConfigError::ValidationError(
				"request_timeout_ms must be non-zero".to_string(),
			));
		}

		Ok(())
	}
}
