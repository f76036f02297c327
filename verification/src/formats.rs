//! Wire formats of tokens, messages and proof locations.

use registry_types::{Platform, SubjectId};

pub const TOKEN_PREFIX: &str = "registry-verification-";
pub const TXT_RECORD_PREFIX: &str = "registry-verification=";
pub const WELL_KNOWN_PATH: &str = "/.well-known/registry-verification.txt";
pub const DNS_RESOLVER_URL: &str = "https://dns.google/resolve";
pub const GITHUB_ORG_API: &str = "https://api.github.com/orgs";
pub const DEFAULT_PUBLIC_VARIABLE: &str = "registryVerification";
pub const VERIFICATION_CODE_KEY: &str = "verification_code";

/// Bytes of randomness in a token (hex doubles the length).
pub const TOKEN_BYTES: usize = 16;
pub const NONCE_BYTES: usize = 8;

pub fn dns_query_url(domain: &str) -> String {
    format!("{DNS_RESOLVER_URL}?name={domain}&type=TXT")
}

pub fn well_known_url(domain: &str) -> String {
    format!("https://{domain}{WELL_KNOWN_PATH}")
}

pub fn github_org_url(org: &str) -> String {
    format!("{GITHUB_ORG_API}/{org}")
}

pub fn txt_record(token: &str) -> String {
    format!("{TXT_RECORD_PREFIX}{token}")
}

/// The text a social post must contain.
pub fn social_required_text(handle: &str, subject: &SubjectId, token: &str) -> String {
    format!("Verifying {handle} for registry subject {subject}: {token}")
}

/// The message a SignMessage challenge asks the subject to sign.
pub fn sign_message_text(subject: &SubjectId, nonce: &str) -> String {
    format!("Verify ownership for {subject}:{nonce}")
}

/// Key under which a special transaction's payload is readable.
pub fn transaction_key(tx_id: &str) -> String {
    format!("tx:{tx_id}")
}

/// Hosts a proof post may live on, per social platform.
pub fn allowed_post_hosts(platform: &Platform) -> &'static [&'static str] {
    match platform {
        Platform::Twitter => &["twitter.com", "x.com", "mobile.twitter.com"],
        Platform::Discord => &["discord.gg", "discord.com", "discordapp.com"],
        Platform::Telegram => &["t.me", "telegram.me"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_and_urls() {
        let subject = SubjectId::from("org-7");
        assert_eq!(sign_message_text(&subject, "ab12"), "Verify ownership for org-7:ab12");
        assert_eq!(
            dns_query_url("example.com"),
            "https://dns.google/resolve?name=example.com&type=TXT"
        );
        assert_eq!(
            well_known_url("example.com"),
            "https://example.com/.well-known/registry-verification.txt"
        );
        assert!(allowed_post_hosts(&Platform::GitHub).is_empty());
    }
}
