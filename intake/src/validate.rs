//! Format and length checks over sanitized values.

use crate::error::IntakeError;
use crate::kind::FieldKind;
use crate::rules::{self, cached};
use crate::sanitize::{MAX_TEXT_LEN, MAX_URL_LEN};
use regex::Regex;
use registry_types::ChainType;
use std::sync::OnceLock;

pub fn validate(kind: &FieldKind, value: &str) -> Result<(), IntakeError> {
    if value.is_empty() {
        return Err(IntakeError::Required);
    }
    match kind {
        FieldKind::Text { max_len } => check_len(value, 1, (*max_len).min(MAX_TEXT_LEN)),
        FieldKind::Url => validate_url(value),
        FieldKind::Domain => validate_domain(value),
        FieldKind::Address(chain) => validate_address(*chain, value),
        FieldKind::GitHubOrg => {
            static RE: OnceLock<Option<Regex>> = OnceLock::new();
            check_len(value, 1, 39)?;
            check_pattern(&RE, r"^[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?$", value, "GitHub organization")
        }
        FieldKind::TwitterHandle => {
            static RE: OnceLock<Option<Regex>> = OnceLock::new();
            let name = value.strip_prefix('@').unwrap_or(value);
            check_len(name, 1, 15)?;
            check_pattern(&RE, r"^@[A-Za-z0-9_]{1,15}$", value, "Twitter handle")
        }
        FieldKind::DiscordInvite => {
            static RE: OnceLock<Option<Regex>> = OnceLock::new();
            check_pattern(&RE, r"^https://discord\.gg/[A-Za-z0-9-]{2,32}$", value, "Discord invite")
        }
        FieldKind::TelegramChannel => {
            static RE: OnceLock<Option<Regex>> = OnceLock::new();
            check_pattern(&RE, r"^https://t\.me/[A-Za-z][A-Za-z0-9_]{4,31}$", value, "Telegram channel")
        }
        FieldKind::FoundingDate => {
            static RE: OnceLock<Option<Regex>> = OnceLock::new();
            check_pattern(
                &RE,
                r"^[12][0-9]{3}(?:-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12][0-9]|3[01]))?$",
                value,
                "founding date (YYYY or YYYY-MM-DD)",
            )
        }
    }
}

fn check_len(value: &str, min: usize, max: usize) -> Result<(), IntakeError> {
    let actual = value.chars().count();
    if actual < min || actual > max {
        return Err(IntakeError::Length { min, max, actual });
    }
    Ok(())
}

fn check_pattern(
    cell: &'static OnceLock<Option<Regex>>,
    pattern: &str,
    value: &str,
    what: &str,
) -> Result<(), IntakeError> {
    match cached(cell, pattern) {
        Some(re) if re.is_match(value) => Ok(()),
        _ => Err(IntakeError::Format(format!("not a valid {what}"))),
    }
}

fn validate_address(chain: ChainType, value: &str) -> Result<(), IntakeError> {
    let Some(rule) = rules::rule_for(chain) else {
        return Err(IntakeError::UnknownKind(chain.to_string()));
    };
    check_len(value, rule.min_len, rule.max_len)?;
    if !rules::matches(chain, value) {
        return Err(IntakeError::Format(format!("not a valid {chain} address")));
    }
    Ok(())
}

/// Validate an address against a chain given by name; unknown names are invalid.
pub fn validate_address_named(chain: &str, address: &str) -> Result<(), IntakeError> {
    let chain: ChainType = chain
        .parse()
        .map_err(|_| IntakeError::UnknownKind(chain.to_string()))?;
    validate(&FieldKind::Address(chain), address)
}

fn validate_domain(value: &str) -> Result<(), IntakeError> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    check_len(value, 4, 253)?;
    check_pattern(
        &RE,
        r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}$",
        value,
        "domain name",
    )
}

fn split_url(value: &str) -> Result<(&str, &str), IntakeError> {
    let lower: String = value.chars().take(8).collect::<String>().to_ascii_lowercase();
    if lower.starts_with("https://") {
        Ok(("https", &value[8..]))
    } else if lower.starts_with("http://") {
        Ok(("http", &value[7..]))
    } else {
        Err(IntakeError::UnsupportedScheme)
    }
}

fn host_of(rest: &str) -> String {
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = authority.rsplit('@').next().unwrap_or_default();
    host.split(':').next().unwrap_or_default().to_ascii_lowercase()
}

fn validate_url(value: &str) -> Result<(), IntakeError> {
    if value.len() > MAX_URL_LEN {
        return Err(IntakeError::Length {
            min: 1,
            max: MAX_URL_LEN,
            actual: value.len(),
        });
    }
    let (_, rest) = split_url(value)?;
    let host = host_of(rest);
    if host.is_empty() {
        return Err(IntakeError::Format("URL has no host".to_string()));
    }
    if !host.is_ascii() {
        return Err(IntakeError::Suspicious("non-ASCII characters in host".to_string()));
    }
    validate_domain(&host).or_else(|_| validate_ipv4(&host))
}

fn validate_ipv4(host: &str) -> Result<(), IntakeError> {
    host.parse::<std::net::Ipv4Addr>()
        .map(|_| ())
        .map_err(|_| IntakeError::Format("URL host is not a valid domain".to_string()))
}

/// The stricter rule for proof URLs: https only, bounded length, ASCII host
/// on the allow-list (exact or subdomain), no `..`/`--` in the host.
pub fn validate_secure_url(url: &str, allowed_hosts: &[&str]) -> Result<(), IntakeError> {
    if url.len() > MAX_URL_LEN {
        return Err(IntakeError::Length {
            min: 1,
            max: MAX_URL_LEN,
            actual: url.len(),
        });
    }
    let Some(rest) = url.strip_prefix("https://") else {
        return Err(IntakeError::UnsupportedScheme);
    };
    let host = host_of(rest);
    if !host.is_ascii() {
        return Err(IntakeError::Suspicious("non-ASCII characters in host".to_string()));
    }
    let allowed = allowed_hosts
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{d}")));
    if !allowed {
        return Err(IntakeError::DomainNotAllowed(allowed_hosts.join(", ")));
    }
    if host.contains("..") || host.contains("--") {
        return Err(IntakeError::Suspicious("hostname pattern".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::example_address;

    #[test]
    fn empty_is_required_not_format() {
        assert_eq!(
            validate(&FieldKind::Address(ChainType::Ethereum), ""),
            Err(IntakeError::Required)
        );
        assert!(matches!(
            validate(&FieldKind::Address(ChainType::Ethereum), "0x12"),
            Err(IntakeError::Length { .. })
        ));
    }

    #[test]
    fn every_example_validates() {
        for chain in ChainType::ALL {
            assert_eq!(validate(&FieldKind::Address(chain), example_address(chain)), Ok(()), "{chain}");
        }
    }

    #[test]
    fn polygon_shares_ethereum_format() {
        let eth = example_address(ChainType::Ethereum);
        assert!(validate(&FieldKind::Address(ChainType::Polygon), eth).is_ok());
    }

    #[test]
    fn named_chain_lookup() {
        assert!(validate_address_named("eth", example_address(ChainType::Ethereum)).is_ok());
        assert!(matches!(
            validate_address_named("dogecoin", "D123"),
            Err(IntakeError::UnknownKind(_))
        ));
    }

    #[test]
    fn url_rules() {
        assert!(validate(&FieldKind::Url, "https://example.com/about").is_ok());
        assert!(validate(&FieldKind::Url, "http://127.0.0.1:8080").is_ok());
        assert_eq!(
            validate(&FieldKind::Url, "javascript:alert(1)"),
            Err(IntakeError::UnsupportedScheme)
        );
        assert!(validate(&FieldKind::Url, "https://").is_err());
    }

    #[test]
    fn handle_rules() {
        assert!(validate(&FieldKind::TwitterHandle, "@acme_dao").is_ok());
        assert!(validate(&FieldKind::TwitterHandle, "@this_handle_is_too_long").is_err());
        assert!(validate(&FieldKind::GitHubOrg, "acme-org").is_ok());
        assert!(validate(&FieldKind::GitHubOrg, "-acme").is_err());
        assert!(validate(&FieldKind::GitHubOrg, &"a".repeat(40)).is_err());
        assert!(validate(&FieldKind::DiscordInvite, "https://discord.gg/abc123").is_ok());
        assert!(validate(&FieldKind::TelegramChannel, "https://t.me/acme_news").is_ok());
    }

    #[test]
    fn founding_date_formats() {
        assert!(validate(&FieldKind::FoundingDate, "2021").is_ok());
        assert!(validate(&FieldKind::FoundingDate, "2021-06-30").is_ok());
        assert!(validate(&FieldKind::FoundingDate, "2021-13-01").is_err());
        assert!(validate(&FieldKind::FoundingDate, "June 2021").is_err());
    }

    #[test]
    fn secure_url_allow_list() {
        let allowed = ["twitter.com", "x.com"];
        assert!(validate_secure_url("https://x.com/acme/status/1", &allowed).is_ok());
        assert!(validate_secure_url("https://mobile.twitter.com/acme/status/1", &allowed).is_ok());
        assert_eq!(
            validate_secure_url("http://x.com/acme", &allowed),
            Err(IntakeError::UnsupportedScheme)
        );
        assert!(matches!(
            validate_secure_url("https://evil-x.com/acme", &allowed),
            Err(IntakeError::DomainNotAllowed(_))
        ));
        assert!(matches!(
            validate_secure_url("https://a--b.x.com/", &allowed),
            Err(IntakeError::Suspicious(_))
        ));
        let long = format!("https://x.com/{}", "a".repeat(MAX_URL_LEN));
        assert!(matches!(
            validate_secure_url(&long, &allowed),
            Err(IntakeError::Length { .. })
        ));
    }
}
