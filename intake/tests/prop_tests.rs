use proptest::prelude::*;

use registry_intake::{sanitize, validate, FieldKind, MAX_TEXT_LEN};
use registry_types::ChainType;

/// Valid addresses at the minimum length of each grammar, so that dropping
/// any character always leaves the accepted range.
const SHORTEST_VALID: &[(ChainType, &str)] = &[
    (ChainType::Ethereum, "0x742d35Cc6634C0532925a3b8D4d3c12de56d0d9E"),
    (ChainType::Polygon, "0x742d35Cc6634C0532925a3b8D4d3c12de56d0d9E"),
    (ChainType::Bitcoin, "1BvBMSEYstWetqTFn5Au4m4GFg"),
    (ChainType::Bitcoin, "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq"),
    (ChainType::Icp, "rdmx6-jaaaa-aaaah-qcaiq-cai"),
    (ChainType::Solana, "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7"),
    (
        ChainType::Sui,
        "0x2d3d1d6e5f7c8a9b0c1d2e3f4a5b6c7d8e9f0a1b2c3d4e5f6a7b8c9d0e1f2a3b",
    ),
    (ChainType::Ton, "EQD2NmD_lH5f5u1Kj3KfGyTvhZSX0Eg6qp2a5IQUKXxOG21n"),
];

fn case() -> impl Strategy<Value = (ChainType, &'static str)> {
    prop::sample::select(SHORTEST_VALID)
}

proptest! {
    /// The unmodified sample passes.
    #[test]
    fn sample_addresses_validate((chain, address) in case()) {
        prop_assert!(validate(&FieldKind::Address(chain), address).is_ok());
    }

    /// Removing any single character makes the address invalid.
    #[test]
    fn removing_a_character_invalidates((chain, address) in case(), idx in any::<prop::sample::Index>()) {
        let i = idx.index(address.len());
        let mut mutated = address.to_string();
        mutated.remove(i);
        prop_assert!(validate(&FieldKind::Address(chain), &mutated).is_err());
    }

    /// Replacing any character with one outside every address alphabet makes it invalid.
    #[test]
    fn altering_a_character_invalidates(
        (chain, address) in case(),
        idx in any::<prop::sample::Index>(),
        replacement in prop::sample::select(vec!['!', '@', '#', '$', '%', '*', '+', '=', '~', '.']),
    ) {
        let i = idx.index(address.len());
        let mut mutated: Vec<char> = address.chars().collect();
        mutated[i] = replacement;
        let mutated: String = mutated.into_iter().collect();
        prop_assert!(validate(&FieldKind::Address(chain), &mutated).is_err());
    }

    /// Sanitized text never carries markup characters or exceeds the ceiling.
    #[test]
    fn sanitized_text_is_inert(raw in ".{0,3000}", max_len in 1usize..5000) {
        let out = sanitize(&FieldKind::Text { max_len }, &raw);
        prop_assert!(!out.contains(['<', '>', '"', '\'', '&']));
        prop_assert!(out.chars().count() <= max_len.min(MAX_TEXT_LEN));
    }

    /// Address sanitization only removes whitespace.
    #[test]
    fn address_sanitization_preserves_non_whitespace(raw in "[ -~\t\n]{0,80}") {
        let out = sanitize(&FieldKind::Address(ChainType::Ethereum), &raw);
        let expected: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        prop_assert_eq!(out, expected);
    }
}
