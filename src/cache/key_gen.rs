use sha2::{Digest, Sha256};

/// File stem for a cache key.
///
/// Keys made of ASCII alphanumerics, `-` and `_` (at most 64 chars) are used
/// verbatim; anything else becomes a short SHA-256 digest so it can never
/// leave the cache directory.
pub fn file_stem(key: &str) -> String {
    let plain = !key.is_empty()
        && key.len() <= 64
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if plain {
        return key.to_string();
    }

    Sha256::digest(key.as_bytes())[..8]
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
