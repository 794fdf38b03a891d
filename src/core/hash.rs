use sha2::{Digest, Sha256};

/// Length of the truncated fingerprint used for pinning and display.
/// A fingerprint, not a security boundary; the full digest stays available
/// wherever collision-resistant comparison might matter later.
pub const FINGERPRINT_LEN: usize = 12;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

pub fn fingerprint(full_hex: &str) -> String {
    full_hex.chars().take(FINGERPRINT_LEN).collect()
}
