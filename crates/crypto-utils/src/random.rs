use rand::RngCore;
use rand_core::OsRng;

/// Generates a fixed-size array of cryptographically secure random bytes.
pub fn random_bytes_fixed<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Draws a uniformly distributed `u64` from the operating system RNG.
///
/// Used for deduplication tags, where two independent transfers from the
/// same key must not collide by accident.
pub fn random_u64() -> u64 {
    OsRng.next_u64()
}
