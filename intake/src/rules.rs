//! The fixed-format table for chain addresses.
//!
//! One rule per chain: an exact regular grammar (one or more alternatives)
//! and a length range. These are public formats and must not drift.

use regex::Regex;
use registry_types::ChainType;
use std::sync::OnceLock;

pub struct AddressRule {
    pub chain: ChainType,
    /// Any alternative matching accepts the address.
    pub patterns: &'static [&'static str],
    pub min_len: usize,
    pub max_len: usize,
    pub description: &'static str,
    pub example: &'static str,
}

const ETHEREUM_PATTERNS: &[&str] = &[r"^0x[a-fA-F0-9]{40}$"];

pub const RULES: &[AddressRule] = &[
    AddressRule {
        chain: ChainType::Ethereum,
        patterns: ETHEREUM_PATTERNS,
        min_len: 42,
        max_len: 42,
        description: "Ethereum addresses start with 0x followed by exactly 40 hexadecimal characters.",
        example: "0x742d35Cc6634C0532925a3b8D4d3c12de56d0d9E",
    },
    AddressRule {
        chain: ChainType::Bitcoin,
        patterns: &[r"^[13][a-km-zA-HJ-NP-Z1-9]{25,34}$", r"^bc1[a-z0-9]{39,59}$"],
        min_len: 26,
        max_len: 62,
        description: "Bitcoin addresses are legacy/P2SH base58 starting with 1 or 3, or Bech32 starting with bc1.",
        example: "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa",
    },
    AddressRule {
        chain: ChainType::Icp,
        patterns: &[r"^[a-z0-9]{5}-[a-z0-9]{5}-[a-z0-9]{5}-[a-z0-9]{5}-[a-z0-9]{3}$"],
        min_len: 27,
        max_len: 27,
        description: "ICP canister ids are five dash-separated lowercase groups: xxxxx-xxxxx-xxxxx-xxxxx-xxx.",
        example: "rdmx6-jaaaa-aaaah-qcaiq-cai",
    },
    AddressRule {
        chain: ChainType::Polygon,
        patterns: ETHEREUM_PATTERNS,
        min_len: 42,
        max_len: 42,
        description: "Polygon addresses use the Ethereum format: 0x followed by 40 hexadecimal characters.",
        example: "0x742d35Cc6634C0532925a3b8D4d3c12de56d0d9E",
    },
    AddressRule {
        chain: ChainType::Solana,
        patterns: &[r"^[1-9A-HJ-NP-Za-km-z]{32,44}$"],
        min_len: 32,
        max_len: 44,
        description: "Solana addresses are base58 strings of 32 to 44 characters (no 0, O, I or l).",
        example: "7dHbWXmci3dT8UFYWGGWnSZwJa8ACHWrAhwRgBAuR7a1",
    },
    AddressRule {
        chain: ChainType::Sui,
        patterns: &[r"^0x[a-fA-F0-9]{64}$"],
        min_len: 66,
        max_len: 66,
        description: "Sui addresses start with 0x followed by exactly 64 hexadecimal characters.",
        example: "0x2d3d1d6e5f7c8a9b0c1d2e3f4a5b6c7d8e9f0a1b2c3d4e5f6a7b8c9d0e1f2a3b",
    },
    AddressRule {
        chain: ChainType::Ton,
        patterns: &[r"^[A-Za-z0-9_-]{48}$"],
        min_len: 48,
        max_len: 48,
        description: "TON addresses are URL-safe base64 strings of exactly 48 characters.",
        example: "EQD2NmD_lH5f5u1Kj3KfGyTvhZSX0Eg6qp2a5IQUKXxOG21n",
    },
];

pub fn rule_for(chain: ChainType) -> Option<&'static AddressRule> {
    RULES.iter().find(|r| r.chain == chain)
}

/// Human-readable format description for a chain.
pub fn address_rules(chain: ChainType) -> &'static str {
    rule_for(chain).map(|r| r.description).unwrap_or("Unsupported chain.")
}

/// A well-formed address for a chain, for help text.
pub fn example_address(chain: ChainType) -> &'static str {
    rule_for(chain).map(|r| r.example).unwrap_or("")
}

type Compiled = Vec<(ChainType, Vec<Regex>)>;

fn compiled() -> &'static Compiled {
    static COMPILED: OnceLock<Compiled> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|rule| {
                // A pattern that fails to compile matches nothing.
                let regexes = rule
                    .patterns
                    .iter()
                    .filter_map(|p| Regex::new(p).ok())
                    .collect();
                (rule.chain, regexes)
            })
            .collect()
    })
}

/// Whether `address` matches one of the chain's grammars.
pub fn matches(chain: ChainType, address: &str) -> bool {
    compiled()
        .iter()
        .find(|(c, _)| *c == chain)
        .is_some_and(|(_, regexes)| regexes.iter().any(|r| r.is_match(address)))
}

/// Compile a fixed pattern once per call site.
pub(crate) fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}
