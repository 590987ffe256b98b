//! Address display names.
//!
//! Graph building only sees the [`AddressResolver`] trait, so the lookup source can be
//! swapped (static table, user address book, remote directory) without touching it.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Maps an address to a human-readable name when one is known.
pub trait AddressResolver {
	/// Known display name for `address`, if any.
	fn resolve(&self, address: &str) -> Option<String>;
}

/// Resolver that never knows a name; every label falls back to the shortened form.
#[cfg(test)]
#[derive(Clone, Copy, Debug, Default)]
pub struct NoNames;

#[cfg(test)]
impl AddressResolver for NoNames {
	fn resolve(&self, _address: &str) -> Option<String> {
		None
	}
}

/// Well-known mainnet addresses, keyed by lowercase hex.
static KNOWN_ADDRESSES: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
	[
		("0x00000000219ab540356cbb839cbe05303d7705fa", "Beacon Deposit Contract"),
		("0xd8da6bf26964af9d7eed9e03e53415d37aa96045", "vitalik.eth"),
		("0x28c6c06298d514db089934071355e5743bf21d60", "Binance 14"),
		("0x21a31ee1afc51d94c2efccaa2092ad1028285549", "Binance 15"),
		("0x71660c4005ba85c37ccec55d0c4493e66fe775d3", "Coinbase 1"),
		("0xdac17f958d2ee523a2206206994597c13d831ec7", "Tether: USDT"),
		("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "Circle: USDC"),
		("0x7a250d5630b4cf539739df2c5dacb4c659f2488d", "Uniswap V2: Router 2"),
		("0xe592427a0aece92de3edee1f18e0157c05861564", "Uniswap V3: Router"),
	]
	.into_iter()
	.map(|(address, name)| (address.to_string(), name))
	.collect()
});

/// Resolver backed by the built-in table of well-known addresses.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticNameTable;

impl AddressResolver for StaticNameTable {
	fn resolve(&self, address: &str) -> Option<String> {
		KNOWN_ADDRESSES
			.get(&address.to_ascii_lowercase())
			.map(|name| name.to_string())
	}
}

/// First 3 and last 2 characters joined by `...`.
pub fn shorten_address(address: &str) -> String {
	let chars: Vec<char> = address.chars().collect();
	if chars.len() <= 5 {
		return address.to_string();
	}
	let head: String = chars[..3].iter().collect();
	let tail: String = chars[chars.len() - 2..].iter().collect();
	format!("{head}...{tail}")
}

/// Label shown on a node: the resolved name, or the shortened address.
pub fn display_label(resolver: &dyn AddressResolver, address: &str) -> String {
	resolver
		.resolve(address)
		.unwrap_or_else(|| shorten_address(address))
}
