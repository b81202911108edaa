//! Small shared utilities: timestamps, IDs, public order references

use sha2::{Digest, Sha256};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current UTC calendar date
pub fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at rental-desk scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Derive the public-facing order reference from an internal order ID.
///
/// The internal snowflake leaks creation time and rough ordering, so orders
/// are shown to clients under an opaque reference instead. The mapping is
/// deterministic (same ID always yields the same reference) so it never
/// needs to be stored separately.
///
/// Format: `DPT-` followed by 8 uppercase hex characters.
pub fn order_reference(order_id: i64) -> String {
    use std::fmt::Write;

    let digest = Sha256::digest(order_id.to_le_bytes());
    let mut reference = String::with_capacity(12);
    reference.push_str("DPT-");
    for byte in &digest[..4] {
        let _ = write!(reference, "{:02X}", byte);
    }
    reference
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_ids_are_positive_and_distinct() {
        let a = snowflake_id();
        let b = snowflake_id();
        assert!(a > 0);
        assert!(b > 0);
        // Same millisecond is fine; the random bits keep collisions unlikely,
        // not impossible, so only sanity-check distinctness over a few draws.
        let ids: std::collections::HashSet<i64> = (0..16).map(|_| snowflake_id()).collect();
        assert!(ids.len() > 1);
    }

    #[test]
    fn test_order_reference_is_deterministic() {
        assert_eq!(order_reference(42), order_reference(42));
        assert_ne!(order_reference(42), order_reference(43));
    }

    #[test]
    fn test_order_reference_format() {
        let reference = order_reference(123456789);
        assert!(reference.starts_with("DPT-"));
        assert_eq!(reference.len(), 12);
        assert!(reference[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}
