use registry_types::{ChainType, Platform};
use serde::{Deserialize, Serialize};

/// The rule set a field is sanitized and validated with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Free text, truncated to `max_len` (never above the global ceiling).
    Text { max_len: usize },
    Url,
    Domain,
    Address(ChainType),
    GitHubOrg,
    TwitterHandle,
    DiscordInvite,
    TelegramChannel,
    /// `YYYY` or `YYYY-MM-DD`.
    FoundingDate,
}

impl FieldKind {
    /// The handle rule for a platform's claim target.
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Domain => Self::Domain,
            Platform::GitHub => Self::GitHubOrg,
            Platform::Twitter => Self::TwitterHandle,
            Platform::Discord => Self::DiscordInvite,
            Platform::Telegram => Self::TelegramChannel,
            Platform::Chain(chain) => Self::Address(chain),
        }
    }
}
