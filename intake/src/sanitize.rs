//! Normalization of raw input. Never fails: anything that cannot be made
//! valid is left for `validate` to reject.

use crate::kind::FieldKind;
use crate::rules::cached;
use regex::Regex;
use std::sync::OnceLock;

/// Absolute ceiling for any text field, whatever its own limit.
pub const MAX_TEXT_LEN: usize = 2000;
pub const MAX_URL_LEN: usize = 2048;

const MARKUP_CHARS: [char; 5] = ['<', '>', '"', '\'', '&'];

pub fn sanitize(kind: &FieldKind, raw: &str) -> String {
    match kind {
        FieldKind::Text { max_len } => sanitize_text(raw, *max_len),
        FieldKind::Url => sanitize_url(raw),
        FieldKind::Domain => sanitize_domain(raw),
        FieldKind::Address(_) => sanitize_address(raw),
        FieldKind::GitHubOrg => sanitize_github_org(raw),
        FieldKind::TwitterHandle => sanitize_twitter(raw),
        FieldKind::DiscordInvite => sanitize_discord(raw),
        FieldKind::TelegramChannel => sanitize_telegram(raw),
        FieldKind::FoundingDate => raw.trim().to_string(),
    }
}

/// Strip markup characters, collapse whitespace, truncate by characters.
pub fn sanitize_text(raw: &str, max_len: usize) -> String {
    let limit = max_len.min(MAX_TEXT_LEN);
    let stripped: String = raw.chars().filter(|c| !MARKUP_CHARS.contains(c)).collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(limit).collect()
}

/// Prepend `https://` to scheme-less input. Other schemes are kept so the
/// validator can reject them explicitly.
pub fn sanitize_url(raw: &str) -> String {
    static SCHEME: OnceLock<Option<Regex>> = OnceLock::new();
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '<' | '>' | '"' | '\''))
        .take(MAX_URL_LEN)
        .collect();
    if cleaned.is_empty() {
        return cleaned;
    }
    let lower = cleaned.to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        return cleaned;
    }
    // `javascript:x` has a scheme, `example.com:8080` does not.
    let has_scheme = cleaned.contains("://")
        || cached(&SCHEME, r"^[A-Za-z][A-Za-z0-9+.\-]*:(?:[^0-9]|$)")
            .is_some_and(|re| re.is_match(&cleaned));
    if has_scheme {
        cleaned
    } else {
        format!("https://{cleaned}")
    }
}

/// Bare lowercase host: scheme, path, port and a trailing dot removed.
pub fn sanitize_domain(raw: &str) -> String {
    let trimmed = raw.trim().to_ascii_lowercase();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(&trimmed);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();
    host.trim_end_matches('.').to_string()
}

/// Whitespace removal only.
pub fn sanitize_address(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

fn strip_url_prefix<'a>(value: &'a str, hosts: &[&str]) -> Option<&'a str> {
    let lower = value.to_ascii_lowercase();
    let rest_start = ["https://", "http://", ""]
        .iter()
        .find_map(|scheme| {
            hosts.iter().find_map(|host| {
                let prefix = format!("{scheme}{host}/");
                lower.starts_with(&prefix).then_some(prefix.len())
            })
        })?;
    Some(&value[rest_start..])
}

fn first_segment(path: &str) -> &str {
    path.split(['/', '?', '#']).next().unwrap_or_default()
}

/// Organization slug, from either a bare name or a github.com URL.
pub fn sanitize_github_org(raw: &str) -> String {
    let trimmed = raw.trim();
    let slug = strip_url_prefix(trimmed, &["github.com", "www.github.com"])
        .map(first_segment)
        .unwrap_or(trimmed);
    slug.trim_start_matches('@').to_string()
}

/// Canonical `@handle` form.
pub fn sanitize_twitter(raw: &str) -> String {
    let trimmed = raw.trim();
    let name = strip_url_prefix(
        trimmed,
        &["twitter.com", "www.twitter.com", "x.com", "www.x.com", "mobile.twitter.com"],
    )
    .map(first_segment)
    .unwrap_or(trimmed);
    let name = name.trim_start_matches('@');
    if name.is_empty() {
        String::new()
    } else {
        format!("@{name}")
    }
}

/// Canonical `https://discord.gg/<invite>` form.
pub fn sanitize_discord(raw: &str) -> String {
    let trimmed = raw.trim();
    let slug = strip_url_prefix(trimmed, &["discord.gg", "discord.com/invite", "discordapp.com/invite"])
        .map(first_segment)
        .unwrap_or(trimmed);
    if slug.is_empty() {
        String::new()
    } else {
        format!("https://discord.gg/{slug}")
    }
}

/// Canonical `https://t.me/<channel>` form.
pub fn sanitize_telegram(raw: &str) -> String {
    let trimmed = raw.trim();
    let slug = strip_url_prefix(trimmed, &["t.me", "telegram.me"])
        .map(first_segment)
        .unwrap_or(trimmed);
    let slug = slug.trim_start_matches('@');
    if slug.is_empty() {
        String::new()
    } else {
        format!("https://t.me/{slug}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_tag_loses_markup() {
        let out = sanitize_text("<script>alert(1)</script>", 200);
        for c in MARKUP_CHARS {
            assert!(!out.contains(c));
        }
        assert_eq!(out, "scriptalert(1)/script");
    }

    #[test]
    fn text_collapses_whitespace_and_truncates() {
        assert_eq!(sanitize_text("  a \n\t b  ", 100), "a b");
        assert_eq!(sanitize_text("abcdef", 3), "abc");
        assert_eq!(sanitize_text(&"x".repeat(5000), 10_000).len(), MAX_TEXT_LEN);
    }

    #[test]
    fn url_gets_https_prefix() {
        assert_eq!(sanitize_url("example.com"), "https://example.com");
        assert_eq!(sanitize_url("example.com:8080/x"), "https://example.com:8080/x");
        assert_eq!(sanitize_url("http://example.com"), "http://example.com");
    }

    #[test]
    fn url_keeps_foreign_scheme_for_rejection() {
        assert_eq!(sanitize_url("javascript:alert(1)"), "javascript:alert(1)");
        assert_eq!(sanitize_url("ftp://example.com"), "ftp://example.com");
    }

    #[test]
    fn address_is_only_stripped() {
        assert_eq!(sanitize_address(" 0xAbC\n123 "), "0xAbC123");
    }

    #[test]
    fn handles_are_canonicalized_without_changing_identity() {
        assert_eq!(sanitize_twitter("Acme_DAO"), "@Acme_DAO");
        assert_eq!(sanitize_twitter("https://x.com/Acme_DAO/status/1"), "@Acme_DAO");
        assert_eq!(sanitize_discord("AbCd12"), "https://discord.gg/AbCd12");
        assert_eq!(sanitize_discord("https://discord.com/invite/AbCd12"), "https://discord.gg/AbCd12");
        assert_eq!(sanitize_telegram("@acme_channel"), "https://t.me/acme_channel");
        assert_eq!(sanitize_github_org("https://github.com/Acme-Org/"), "Acme-Org");
    }

    #[test]
    fn domain_is_reduced_to_host() {
        assert_eq!(sanitize_domain("HTTPS://Example.COM/path?q"), "example.com");
        assert_eq!(sanitize_domain("example.com:443"), "example.com");
    }
}
