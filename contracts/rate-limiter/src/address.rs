//! Bech32 account address validation for whitelist entries.
//!
//! Whitelisted pairs routinely name an account on the counterparty chain
//! (`osmo1...` sending to `terra1...`), so `Api::addr_validate`, which only
//! knows the local prefix, can't be used. An address is accepted when it is a
//! well-formed bech32 string of any human-readable prefix with a valid checksum
//! and a non-empty payload. All-uppercase input is accepted; mixed case is not.

use bech32::{FromBase32, Variant};

use crate::error::ContractError;

/// Validates `addr` and returns the decoded account bytes.
pub fn validate_bech32_address(addr: &str) -> Result<Vec<u8>, ContractError> {
    let invalid = |reason: String| ContractError::InvalidAddress {
        reason: format!("{}: {}", addr, reason),
    };

    if addr.is_empty() {
        return Err(invalid("address can not be empty".to_string()));
    }

    let (_hrp, data, variant) =
        bech32::decode(addr).map_err(|e| invalid(format!("invalid bech32 address: {}", e)))?;
    if variant != Variant::Bech32 {
        return Err(invalid("bech32m encoding is not an account address".to_string()));
    }

    let bytes = Vec::<u8>::from_base32(&data)
        .map_err(|e| invalid(format!("invalid base32 data: {}", e)))?;
    if bytes.is_empty() {
        return Err(invalid("address can not be empty".to_string()));
    }

    Ok(bytes)
}

/// Canonical form an address is stored and looked up under. Bech32 is case
/// insensitive, so this is the lowercase spelling.
pub fn normalize_address(addr: &str) -> String {
    addr.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_any_prefix() {
        let terra = validate_bech32_address("terra1x46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v").unwrap();
        assert_eq!(terra.len(), 20);

        let cosmos =
            validate_bech32_address("cosmos1qyqszqgpqyqszqgpqyqszqgpqyqszqgpjnp7du").unwrap();
        assert_eq!(cosmos, vec![1u8; 20]);

        let osmo = validate_bech32_address("osmo1qvpsxqcrqvpsxqcrqvpsxqcrqvpsxqcr2u426e").unwrap();
        assert_eq!(osmo, vec![3u8; 20]);
    }

    #[test]
    fn test_accepts_32_byte_accounts() {
        let bytes = validate_bech32_address(
            "cosmos1qurswpc8qurswpc8qurswpc8qurswpc8qurswpc8qurswpc8qurs79d55s",
        )
        .unwrap();
        assert_eq!(bytes, vec![7u8; 32]);
    }

    #[test]
    fn test_accepts_uppercase_rejects_mixed_case() {
        let upper =
            validate_bech32_address("COSMOS1QYQSZQGPQYQSZQGPQYQSZQGPQYQSZQGPJNP7DU").unwrap();
        assert_eq!(upper, vec![1u8; 20]);

        assert!(
            validate_bech32_address("Cosmos1qyqszqgpqyqszqgpqyqszqgpqyqszqgpjnp7du").is_err()
        );
        assert!(
            validate_bech32_address("cosmos1qyqszqgpqyqszqgpqyqszqgpqyqszqgpJNP7DU").is_err()
        );
    }

    #[test]
    fn test_rejects_bad_checksum() {
        // last character altered
        assert!(
            validate_bech32_address("cosmos1qyqszqgpqyqszqgpqyqszqgpqyqszqgpjnp7dv").is_err()
        );
    }

    #[test]
    fn test_rejects_bech32m() {
        let err =
            validate_bech32_address("cosmos1qyqszqgpqyqszqgpqyqszqgpqyqszqgp803jg7").unwrap_err();
        assert!(err.to_string().contains("bech32m"));
    }

    #[test]
    fn test_rejects_empty_payload() {
        let err = validate_bech32_address("cosmos1550dq7").unwrap_err();
        assert!(err.to_string().contains("can not be empty"));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(validate_bech32_address("").is_err());
        assert!(validate_bech32_address("noseparator").is_err());
        assert!(validate_bech32_address("1qyqszqgpqyqszqgp").is_err());
        assert!(validate_bech32_address("cosmos1abc").is_err());
        // 'b' is not in the bech32 alphabet
        assert!(validate_bech32_address("cosmos1bbbbbbbbbbbbbbbbbbbbbbbbbbbbbb").is_err());
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            normalize_address("COSMOS1QYQSZQGPQYQSZQGPQYQSZQGPQYQSZQGPJNP7DU"),
            "cosmos1qyqszqgpqyqszqgpqyqszqgpqyqszqgpjnp7du"
        );
    }
}
