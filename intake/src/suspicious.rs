use crate::error::IntakeError;
use registry_types::ChainType;
use tracing::warn;

/// Known burn and test addresses that nobody can legitimately claim.
const SUSPICIOUS_PATTERNS: &[&str] = &[
    "0x0000000000000000000000000000000000000000",
    "1111111111111111111114oLvT2",
    "aaaaa-aa",
];

const MAX_ADDRESS_LEN: usize = 200;

/// Reject burn/test addresses and oversized input. Runs before format checks.
pub fn check_suspicious_address(chain: ChainType, address: &str) -> Result<(), IntakeError> {
    if address.len() > MAX_ADDRESS_LEN {
        warn!(
            target: "registry::security",
            %chain,
            len = address.len(),
            "excessively long address rejected"
        );
        return Err(IntakeError::Suspicious("address exceeds maximum length".to_string()));
    }
    if SUSPICIOUS_PATTERNS.iter().any(|p| address.contains(p)) {
        warn!(target: "registry::security", %chain, address, "suspicious address pattern rejected");
        return Err(IntakeError::Suspicious("address matches a known burn or test address".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burn_addresses_are_rejected() {
        assert!(check_suspicious_address(
            ChainType::Ethereum,
            "0x0000000000000000000000000000000000000000"
        )
        .is_err());
        assert!(check_suspicious_address(ChainType::Icp, "aaaaa-aa").is_err());
    }

    #[test]
    fn ordinary_address_passes() {
        assert!(check_suspicious_address(
            ChainType::Ethereum,
            "0x742d35Cc6634C0532925a3b8D4d3c12de56d0d9E"
        )
        .is_ok());
    }

    #[test]
    fn oversized_input_is_rejected() {
        assert!(check_suspicious_address(ChainType::Solana, &"1".repeat(201)).is_err());
    }
}
