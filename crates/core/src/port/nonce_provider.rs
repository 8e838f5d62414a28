// Nonce Provider Port (for deterministic testing)

/// Nonce provider interface (allows deterministic request ids in tests)
#[cfg_attr(test, mockall::automock)]
pub trait NonceProvider: Send + Sync {
    /// Generate a fresh request id
    fn next_nonce(&self) -> String;
}

/// Random 64-bit nonce rendered in decimal (production)
///
/// Not cryptographically hardened; collisions are only improbable.
pub struct RandomNonceProvider;

impl NonceProvider for RandomNonceProvider {
    fn next_nonce(&self) -> String {
        rand::random::<u64>().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_nonce_is_decimal_u64() {
        let nonce = RandomNonceProvider.next_nonce();
        assert!(nonce.parse::<u64>().is_ok());
    }

    #[test]
    fn test_random_nonces_differ() {
        let provider = RandomNonceProvider;
        assert_ne!(provider.next_nonce(), provider.next_nonce());
    }
}
