use rand::RngCore;

/// Generate a booking's public handle: 32 random bytes, hex-encoded
/// to 64 lowercase hex characters (spec §8, invariant 8).
pub fn generate_booking_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_64_lowercase_hex_chars() {
        let token = generate_booking_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn two_tokens_are_distinct() {
        let a = generate_booking_token();
        let b = generate_booking_token();
        assert_ne!(a, b);
    }
}
