/// Compare two secrets in constant time
///
/// Runs over the whole input regardless of where the first mismatch is,
/// so response timing does not reveal how much of a password was right.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().len() == expected.as_bytes().len()
        && provided
            .as_bytes()
            .iter()
            .zip(expected.as_bytes().iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
