//! Plain-text instructions shown to a subject.

use crate::formats;
use registry_intake::{address_rules, example_address};
use registry_types::{ChainMethod, Challenge, Platform, VerificationMethod};

/// General guidance for a platform, before any challenge exists.
pub fn platform_instructions(platform: Platform) -> String {
    match platform {
        Platform::Domain => format!(
            "Request a domain challenge, then either add a DNS TXT record \
             `{}<token>` to your domain or serve the token at `https://<domain>{}`. \
             DNS changes may take time to propagate.",
            formats::TXT_RECORD_PREFIX,
            formats::WELL_KNOWN_PATH
        ),
        Platform::GitHub => "Request a GitHub challenge and place the token in your \
             organization's public description, then submit for verification."
            .to_string(),
        Platform::Twitter | Platform::Discord | Platform::Telegram => format!(
            "Request a {platform} challenge, publish the exact required text in a public post \
             on {}, then submit the post URL. The post must stay public: deleting it \
             will remove the verification after the grace period.",
            formats::allowed_post_hosts(&platform).join(" / ")
        ),
        Platform::Chain(chain) => format!(
            "{}\nExample: {}\nChoose a method: sign a message with the address key, deploy a \
             contract embedding a verification code, set a public variable on an existing \
             contract, or send a transaction carrying given data.",
            address_rules(chain),
            example_address(chain)
        ),
    }
}

/// What to do with a specific challenge.
pub fn challenge_instructions(challenge: &Challenge) -> String {
    let target = &challenge.claim.target;
    let expires = challenge.expires_at;
    let body = match &challenge.method {
        VerificationMethod::DnsTxtRecord => format!(
            "Add a TXT record to {target} with the value `{}`.",
            formats::txt_record(&challenge.token)
        ),
        VerificationMethod::WellKnownFile => format!(
            "Serve `{}` at {}.",
            challenge.token,
            formats::well_known_url(target)
        ),
        VerificationMethod::ProfileField => format!(
            "Add `{}` to the public description of the GitHub organization {target}.",
            challenge.token
        ),
        VerificationMethod::PublicPost => format!(
            "Publish a public post from {target} containing exactly:\n{}\nthen submit its URL.",
            challenge.expected_text()
        ),
        VerificationMethod::Chain(ChainMethod::SignMessage { message }) => format!(
            "Sign this message with the key of {target} and submit the hex signature:\n{message}"
        ),
        VerificationMethod::Chain(ChainMethod::DeploySpecialContract { verification_code }) => format!(
            "Deploy a contract from {target} exposing `{}` = `{verification_code}` and submit its address.",
            formats::VERIFICATION_CODE_KEY
        ),
        VerificationMethod::Chain(ChainMethod::SetPublicVariable { variable_name, value }) => format!(
            "Set the public variable `{variable_name}` on {target} to `{value}`."
        ),
        VerificationMethod::Chain(ChainMethod::SpecialTransaction { transaction_data }) => format!(
            "Send a transaction from {target} carrying `{transaction_data}` and submit its id."
        ),
    };
    format!("{body}\nThis challenge expires at {expires} and can be used once.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_types::{ChainType, ClaimKey, Timestamp};

    #[test]
    fn domain_instructions_name_the_record() {
        let challenge = Challenge {
            id: "c".into(),
            claim: ClaimKey::new("org".into(), Platform::Domain, "example.com"),
            method: VerificationMethod::DnsTxtRecord,
            token: "registry-verification-abc".into(),
            required_text: None,
            created_at: Timestamp::new(0),
            expires_at: Timestamp::new(86_400),
            consumed_at: None,
        };
        let text = challenge_instructions(&challenge);
        assert!(text.contains("registry-verification=registry-verification-abc"));
    }

    #[test]
    fn chain_instructions_include_format_rule() {
        let text = platform_instructions(Platform::Chain(ChainType::Sui));
        assert!(text.contains("64 hexadecimal"));
    }
}
