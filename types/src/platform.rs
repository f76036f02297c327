//! Platforms and chains on which an organization can claim an identity.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A blockchain on which addresses and contracts can be claimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChainType {
    Ethereum,
    Bitcoin,
    Icp,
    Polygon,
    Solana,
    Sui,
    Ton,
}

impl ChainType {
    pub const ALL: [ChainType; 7] = [
        ChainType::Ethereum,
        ChainType::Bitcoin,
        ChainType::Icp,
        ChainType::Polygon,
        ChainType::Solana,
        ChainType::Sui,
        ChainType::Ton,
    ];

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Bitcoin => "bitcoin",
            Self::Icp => "icp",
            Self::Polygon => "polygon",
            Self::Solana => "solana",
            Self::Sui => "sui",
            Self::Ton => "ton",
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChainType {
    type Err = TypesError;

    /// Accepts canonical names and common tickers (`eth`, `btc`, `sol`, `matic`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ethereum" | "eth" => Ok(Self::Ethereum),
            "bitcoin" | "btc" => Ok(Self::Bitcoin),
            "icp" | "internet_computer" => Ok(Self::Icp),
            "polygon" | "matic" => Ok(Self::Polygon),
            "solana" | "sol" => Ok(Self::Solana),
            "sui" => Ok(Self::Sui),
            "ton" => Ok(Self::Ton),
            other => Err(TypesError::UnknownChain(other.to_string())),
        }
    }
}

/// Where a claim lives: a web platform or a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    Domain,
    GitHub,
    Twitter,
    Discord,
    Telegram,
    Chain(ChainType),
}

impl Platform {
    pub fn is_social(&self) -> bool {
        matches!(self, Self::Twitter | Self::Discord | Self::Telegram)
    }

    pub fn chain(&self) -> Option<ChainType> {
        match self {
            Self::Chain(chain) => Some(*chain),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain => f.write_str("domain"),
            Self::GitHub => f.write_str("github"),
            Self::Twitter => f.write_str("twitter"),
            Self::Discord => f.write_str("discord"),
            Self::Telegram => f.write_str("telegram"),
            Self::Chain(chain) => write!(f, "chain:{chain}"),
        }
    }
}

impl FromStr for Platform {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if let Some(chain) = lower.strip_prefix("chain:") {
            return chain.parse().map(Self::Chain);
        }
        match lower.as_str() {
            "domain" => Ok(Self::Domain),
            "github" => Ok(Self::GitHub),
            "twitter" | "x" => Ok(Self::Twitter),
            "discord" => Ok(Self::Discord),
            "telegram" => Ok(Self::Telegram),
            other => other
                .parse::<ChainType>()
                .map(Self::Chain)
                .map_err(|_| TypesError::UnknownPlatform(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_display_parses_back() {
        for platform in [
            Platform::Domain,
            Platform::GitHub,
            Platform::Twitter,
            Platform::Discord,
            Platform::Telegram,
            Platform::Chain(ChainType::Sui),
        ] {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn chain_aliases() {
        assert_eq!("ETH".parse::<ChainType>().unwrap(), ChainType::Ethereum);
        assert_eq!("matic".parse::<ChainType>().unwrap(), ChainType::Polygon);
        assert_eq!("solana".parse::<Platform>().unwrap(), Platform::Chain(ChainType::Solana));
        assert!("dogecoin".parse::<ChainType>().is_err());
    }
}
