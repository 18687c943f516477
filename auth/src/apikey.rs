use subtle::ConstantTimeEq;

/// Compare a presented API key against the expected key in constant time.
///
/// The byte comparison does not short-circuit on the first differing byte,
/// so response timing carries no information about how much of the key was
/// right. Length still differs observably; keys are fixed-length in
/// practice.
pub fn verify_api_key(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}
