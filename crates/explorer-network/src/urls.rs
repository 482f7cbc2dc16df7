//! Internal links that preserve the selected network.

use explorer_types::{ChainMode, NetworkIdentity};

/// Encodes the active network into an internal navigation link so a
/// full page load lands on the same network. Pure and deterministic:
/// built-ins carry only their chain; custom networks additionally
/// carry their API endpoint, and ride the testnet chain parameter
/// the way user-added endpoints always have.
pub fn build_url(path: &str, network: &NetworkIdentity, mode: ChainMode) -> String {
	let chain = match (network.is_custom, mode) {
		(false, ChainMode::Mainnet) => "mainnet",
		_ => "testnet",
	};

	let separator = if path.contains('?') { '&' } else { '?' };
	let mut href = format!("{path}{separator}chain={chain}");
	if network.is_custom {
		href.push_str("&api=");
		href.push_str(&urlencoding::encode(&network.url));
	}
	href
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builtin_mainnet_link_carries_only_the_chain() {
		let network = NetworkIdentity::builtin("https://api.mainnet.example", "Mainnet");
		assert_eq!(
			build_url("/transactions", &network, ChainMode::Mainnet),
			"/transactions?chain=mainnet"
		);
	}

	#[test]
	fn builtin_testnet_link_carries_only_the_chain() {
		let network = NetworkIdentity::builtin("https://api.testnet.example", "Testnet");
		assert_eq!(
			build_url("/", &network, ChainMode::Testnet),
			"/?chain=testnet"
		);
	}

	#[test]
	fn custom_network_link_encodes_the_endpoint() {
		let network = NetworkIdentity::custom("https://custom.example/v2", "Custom");
		assert_eq!(
			build_url("/transactions", &network, ChainMode::Unknown),
			"/transactions?chain=testnet&api=https%3A%2F%2Fcustom.example%2Fv2"
		);
	}

	#[test]
	fn subnet_link_rides_the_testnet_chain_parameter() {
		let network = NetworkIdentity::subnet("https://subnet.example", "Subnet");
		assert_eq!(
			build_url("/transactions", &network, ChainMode::Unknown),
			"/transactions?chain=testnet&api=https%3A%2F%2Fsubnet.example"
		);
	}

	#[test]
	fn existing_query_string_is_extended() {
		let network = NetworkIdentity::builtin("https://api.mainnet.example", "Mainnet");
		assert_eq!(
			build_url("/txid/0xabc?tab=events", &network, ChainMode::Mainnet),
			"/txid/0xabc?tab=events&chain=mainnet"
		);
	}
}
