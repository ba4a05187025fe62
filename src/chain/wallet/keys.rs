use ed25519_dalek::{SigningKey, SECRET_KEY_LENGTH};
use sha3::{Digest, Sha3_256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use zeroize::Zeroizing;

pub const PRIVATE_KEY_LENGTH: usize = SECRET_KEY_LENGTH;
pub const AUTH_KEY_LENGTH: usize = 32;
pub const ADDRESS_LENGTH: usize = 16;

/// Scheme byte appended to a single Ed25519 public key before hashing
const ED25519_SCHEME: u8 = 0x00;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum KeyError {
    #[error("not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Authentication key of a Diem account: SHA3-256 over the public key and scheme byte
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthenticationKey([u8; AUTH_KEY_LENGTH]);

impl AuthenticationKey {
    pub fn ed25519(public_key: &[u8; 32]) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(public_key);
        hasher.update([ED25519_SCHEME]);

        let mut auth_key = [0u8; AUTH_KEY_LENGTH];
        auth_key.copy_from_slice(&hasher.finalize());
        Self(auth_key)
    }

    /// The account address is the trailing half of the auth key
    pub fn derived_address(&self) -> AccountAddress {
        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(&self.0[AUTH_KEY_LENGTH - ADDRESS_LENGTH..]);
        AccountAddress(address)
    }

    pub fn as_bytes(&self) -> &[u8; AUTH_KEY_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for AuthenticationKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let key: [u8; AUTH_KEY_LENGTH] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| KeyError::InvalidLength {
                    expected: AUTH_KEY_LENGTH,
                    actual: bytes.len(),
                })?;
        Ok(Self(key))
    }
}

impl fmt::Display for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthenticationKey({})", self.to_hex())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountAddress([u8; ADDRESS_LENGTH]);

impl AccountAddress {
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.to_hex())
    }
}

/// Local account backed by an Ed25519 private key
/// The signing key zeroizes itself on drop
pub struct LocalAccount {
    signing_key: SigningKey,
    auth_key: AuthenticationKey,
}

impl LocalAccount {
    /// Create an account from a hex-encoded 32-byte private key
    pub fn from_private_key_hex(key: &str) -> Result<Self, KeyError> {
        // Decoded bytes are wiped as soon as the signing key owns a copy
        let bytes = Zeroizing::new(hex::decode(key)?);
        let private_key: &[u8; PRIVATE_KEY_LENGTH] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| KeyError::InvalidLength {
                    expected: PRIVATE_KEY_LENGTH,
                    actual: bytes.len(),
                })?;

        Ok(Self::from_private_key_bytes(private_key))
    }

    pub fn from_private_key_bytes(private_key: &[u8; PRIVATE_KEY_LENGTH]) -> Self {
        let signing_key = SigningKey::from_bytes(private_key);
        let auth_key = AuthenticationKey::ed25519(signing_key.verifying_key().as_bytes());

        Self {
            signing_key,
            auth_key,
        }
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    pub fn auth_key(&self) -> AuthenticationKey {
        self.auth_key
    }

    pub fn address(&self) -> AccountAddress {
        self.auth_key.derived_address()
    }
}

impl fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalAccount")
            .field("public_key", &hex::encode(self.public_key()))
            .field("auth_key", &self.auth_key.to_hex())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    #[test]
    fn test_zero_key_vector() {
        let account = LocalAccount::from_private_key_hex(ZERO_KEY).unwrap();

        assert_eq!(
            hex::encode(account.public_key()),
            "3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29"
        );
        assert_eq!(
            account.auth_key().to_hex(),
            "08e845d10bbb594fcffceb36d934a188bb84d9cdf7362e4e2522265b185127cb"
        );
        assert_eq!(account.address().to_hex(), "bb84d9cdf7362e4e2522265b185127cb");
    }

    #[test]
    fn test_rfc8032_key_vector() {
        // RFC 8032 section 7.1, test 1
        let account = LocalAccount::from_private_key_hex(
            "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60",
        )
        .unwrap();

        assert_eq!(
            hex::encode(account.public_key()),
            "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
        );
        assert_eq!(
            account.auth_key().to_hex(),
            "63c5215e87770d17b9f4cd47c777e322f4eb152cfd2054c1080fd9d57c48913b"
        );
    }

    #[test]
    fn test_deterministic_derivation() {
        let key: [u8; 32] = rand::random();

        let first = LocalAccount::from_private_key_bytes(&key);
        let second = LocalAccount::from_private_key_hex(&hex::encode(key)).unwrap();

        assert_eq!(first.auth_key(), second.auth_key());
        assert_eq!(first.address(), second.address());
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let lower = LocalAccount::from_private_key_hex(&"ab".repeat(32)).unwrap();
        let upper = LocalAccount::from_private_key_hex(&"AB".repeat(32)).unwrap();
        assert_eq!(lower.auth_key(), upper.auth_key());
    }

    #[test]
    fn test_odd_length_rejected() {
        let err = LocalAccount::from_private_key_hex(&"0".repeat(63)).unwrap_err();
        assert_eq!(err, KeyError::InvalidHex(hex::FromHexError::OddLength));
    }

    #[test]
    fn test_non_hex_rejected() {
        let key = format!("zz{}", "00".repeat(31));
        let err = LocalAccount::from_private_key_hex(&key).unwrap_err();
        assert!(matches!(err, KeyError::InvalidHex(_)));
    }

    #[test]
    fn test_prefixed_or_padded_keys_rejected() {
        assert!(LocalAccount::from_private_key_hex(&format!("0x{}", ZERO_KEY)).is_err());
        assert!(LocalAccount::from_private_key_hex(&format!(" {}", ZERO_KEY)).is_err());
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = LocalAccount::from_private_key_hex(&"00".repeat(15)).unwrap_err();
        assert_eq!(
            err,
            KeyError::InvalidLength {
                expected: 32,
                actual: 15
            }
        );

        let err = LocalAccount::from_private_key_hex(&"00".repeat(33)).unwrap_err();
        assert!(matches!(err, KeyError::InvalidLength { actual: 33, .. }));
    }

    #[test]
    fn test_auth_key_parse_round_trip() {
        let account = LocalAccount::from_private_key_hex(ZERO_KEY).unwrap();
        let parsed: AuthenticationKey = account.auth_key().to_hex().parse().unwrap();
        assert_eq!(parsed, account.auth_key());
        assert!("abcd".parse::<AuthenticationKey>().is_err());
    }

    #[test]
    fn test_debug_hides_private_key() {
        let account = LocalAccount::from_private_key_hex(&"11".repeat(32)).unwrap();
        let rendered = format!("{:?}", account);
        assert!(!rendered.contains(&"11".repeat(32)));
        assert!(rendered.contains(&account.auth_key().to_hex()));
    }
}
