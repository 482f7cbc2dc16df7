use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use explorer_client::{HttpIndexerApi, IndexerApi};
use explorer_config::{ConfigLoader, ExplorerConfig};
use explorer_feed::TransactionFeedMerger;
use explorer_network::{build_url, ExplorerContext, NetworkRegistry, NetworkResolver};
use explorer_types::{ChainMode, NetworkIdentity, TransactionKind};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bootstrap;

#[derive(Parser)]
#[command(name = "explorer-service")]
#[command(about = "Blockchain explorer core service", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	#[arg(short, long, value_name = "FILE", default_value = "config/local.toml")]
	config: PathBuf,

	#[arg(long, env = "EXPLORER_LOG_LEVEL", default_value = "info")]
	log_level: String,
}

#[derive(Subcommand)]
enum Commands {
	/// List configured networks with their resolved chain identity
	Networks,
	/// Print the merged recent-transactions feed for the active network
	Transactions {
		/// Extra confirmed pages to load after the bootstrap page
		#[arg(long, default_value_t = 0)]
		pages: u32,
	},
	/// Validate the configuration file
	Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_tracing(&cli.log_level)?;

	match cli.command {
		Some(Commands::Networks) => list_networks(cli).await,
		Some(Commands::Transactions { pages }) => print_transactions(cli, pages).await,
		Some(Commands::Validate) => validate(cli).await,
		None => print_transactions(cli, 0).await,
	}
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	Ok(())
}

async fn load_config(cli: &Cli) -> Result<ExplorerConfig> {
	info!("Loading configuration from: {:?}", cli.config);
	ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.context("Failed to load configuration")
}

fn build_context(
	config: &ExplorerConfig,
) -> Result<(Arc<dyn IndexerApi>, ExplorerContext)> {
	let api: Arc<dyn IndexerApi> = Arc::new(HttpIndexerApi::new(Duration::from_millis(
		config.api.request_timeout_ms,
	)));

	let mut registry = NetworkRegistry::new(
		&config.networks.mainnet_api_url,
		&config.networks.testnet_api_url,
	)
	.context("Failed to build network registry")?;

	if let Some(devnet) = &config.networks.devnet_api_url {
		registry
			.register(NetworkIdentity::custom(devnet.as_str(), "Devnet"))
			.context("Failed to register devnet")?;
	}

	if let Some(subnet) = &config.networks.subnet_api_url {
		registry
			.register(NetworkIdentity::subnet(subnet.as_str(), "Subnet"))
			.context("Failed to register subnet")?;
	}

	let resolver = Arc::new(
		NetworkResolver::new(
			api.clone(),
			registry.networks()[0].url.clone(),
			registry.networks()[1].url.clone(),
		)
		.with_stale_after(Duration::from_secs(config.api.resolution_stale_secs)),
	);

	Ok((api, ExplorerContext::new(registry, resolver)))
}

async fn list_networks(cli: Cli) -> Result<()> {
	let config = load_config(&cli).await?;
	let (_, context) = build_context(&config)?;

	let networks = context.networks().await;
	let active = context.active_network().await;

	let resolutions = futures::future::join_all(
		networks
			.iter()
			.map(|network| context.resolver().resolve(&network.url)),
	)
	.await;

	for (network, resolution) in networks.iter().zip(resolutions) {
		let badge = if network.is_subnet {
			"subnet".to_string()
		} else {
			resolution
				.chain_mode()
				.map(|mode| mode.to_string())
				.unwrap_or_else(|| "offline".to_string())
		};
		let marker = if network.url == active.url { "*" } else { " " };
		let mode = resolution.chain_mode().unwrap_or(ChainMode::Unknown);
		println!(
			"{} {:<12} {:<10} {}  ({})",
			marker,
			network.label,
			badge,
			network.url,
			build_url("/", network, mode)
		);
	}

	Ok(())
}

async fn print_transactions(cli: Cli, pages: u32) -> Result<()> {
	let config = load_config(&cli).await?;
	let (api, context) = build_context(&config)?;

	let active = context.active_network().await;
	info!("Bootstrapping feeds for {}", active.url);

	let kinds = TransactionKind::ALL.to_vec();
	let initial = bootstrap::fetch_initial_pages(
		api.as_ref(),
		&active.url,
		config.api.bootstrap_limit,
		config.api.page_limit,
		&kinds,
	)
	.await
	.map_err(|e| anyhow::anyhow!("Failed to bootstrap feeds: {}", e))?;

	let merger = TransactionFeedMerger::new(
		api,
		active.url.clone(),
		config.api.page_limit,
		kinds,
		initial.confirmed,
		initial.pending,
	);

	for _ in 0..pages {
		merger.load_more_confirmed().await;
	}

	let view = merger.view().await;

	println!("Pending ({})", view.pending.items.len());
	for tx in &view.pending.items {
		println!("  {}  {}", tx.id, tx.kind.as_str());
	}

	println!("Confirmed ({})", view.confirmed.items.len());
	for tx in &view.confirmed.items {
		println!("  {}  {}", tx.id, tx.kind.as_str());
	}

	if let Some(error) = &view.confirmed.error {
		println!("! confirmed feed error (retryable): {}", error);
	}
	if view.confirmed.is_reaching_end {
		println!("-- end of confirmed feed --");
	}

	Ok(())
}

async fn validate(cli: Cli) -> Result<()> {
	let config = load_config(&cli).await?;
	let (_, _context) = build_context(&config)?;

	info!("Configuration is valid");
	info!("Explorer name: {}", config.explorer.name);
	info!("Mainnet API: {}", config.networks.mainnet_api_url);
	info!("Testnet API: {}", config.networks.testnet_api_url);
	if let Some(devnet) = &config.networks.devnet_api_url {
		info!("Devnet API: {}", devnet);
	}

	Ok(())
}
