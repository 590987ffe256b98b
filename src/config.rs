//! Runtime settings shared through Leptos context.

use crate::transactions::PAGE_SIZE;

/// Endpoints and limits used by the transaction graph page.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	/// Transaction listing endpoint. Relative paths resolve against the page origin.
	pub api_endpoint: String,
	/// Value sent as the `offset` query parameter.
	pub page_size: usize,
	/// Block explorer prefix; the node id is appended.
	pub explorer_url: String,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			api_endpoint: "/api/transactions".into(),
			page_size: PAGE_SIZE,
			explorer_url: "https://etherscan.io/address/".into(),
		}
	}
}

impl GraphConfig {
	/// Explorer page for an address.
	pub fn explorer_link(&self, address: &str) -> String {
		format!("{}{}", self.explorer_url, address)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_matches_public_endpoints() {
		let config = GraphConfig::default();
		assert_eq!(config.api_endpoint, "/api/transactions");
		assert_eq!(config.page_size, 50);
		assert_eq!(
			config.explorer_link("0xabc"),
			"https://etherscan.io/address/0xabc"
		);
	}
}
