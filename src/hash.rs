use sha2::Digest as _;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = sha2::Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// First 16 hex chars of the sha256: a compact key for directory and log
/// file names.
pub fn short_fs_key(bytes: &[u8]) -> String {
    sha256_hex(bytes).chars().take(16).collect()
}
