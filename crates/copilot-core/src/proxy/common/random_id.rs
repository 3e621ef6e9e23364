// identifier generators

use rand::Rng;

/// Session id: random UUID followed by the mint time in milliseconds, so two
/// rotations never collide even with a reused UUID.
pub fn generate_session_id() -> String {
    format!("{}{}", uuid::Uuid::new_v4(), chrono::Utc::now().timestamp_millis())
}

pub fn generate_device_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Lowercase hex string of `len` characters.
pub fn random_hex(len: usize) -> String {
    const HEX: &[u8] = b"0123456789abcdef";
    let mut rng = rand::thread_rng();
    (0..len).map(|_| char::from(HEX[rng.gen_range(0..HEX.len())])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_unique() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_ne!(a, b);
        assert!(a.len() > 36);
    }

    #[test]
    fn test_device_id_is_uuid() {
        let id = generate_device_id();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_random_hex() {
        let hex = random_hex(12);
        assert_eq!(hex.len(), 12);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
