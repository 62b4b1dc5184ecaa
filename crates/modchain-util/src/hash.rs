/// Compute the BLAKE3 hash of a byte slice, returning the hex-encoded digest.
#[must_use]
pub fn blake3_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Check `data` against a recorded hex digest.
///
/// Surrounding whitespace and letter case in `expected` are ignored, so a
/// sidecar file written with a trailing newline still matches.
#[must_use]
pub fn blake3_matches(data: &[u8], expected: &str) -> bool {
    blake3_bytes(data).eq_ignore_ascii_case(expected.trim())
}
