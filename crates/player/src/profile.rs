//! Anonymous profile code generation.
//!
//! A learner gets one code, stores it locally, and reuses it forever; the
//! recorder creates the profile row lazily on first sight of the code.

use rand::Rng;

use reps_core::model::ProfileCode;

/// Fixed literal prefix for locally generated codes.
pub const PROFILE_CODE_PREFIX: &str = "REPS-";

const SUFFIX_LEN: usize = 6;
const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate a fresh profile code: the fixed prefix plus a random base-36
/// suffix.
///
/// # Panics
///
/// Never panics in practice: the generated string is non-blank by
/// construction, so parsing always succeeds.
#[must_use]
pub fn generate_profile_code() -> ProfileCode {
    let mut rng = rand::rng();
    let mut code = String::with_capacity(PROFILE_CODE_PREFIX.len() + SUFFIX_LEN);
    code.push_str(PROFILE_CODE_PREFIX);
    for _ in 0..SUFFIX_LEN {
        let idx = rng.random_range(0..ALPHABET.len());
        code.push(char::from(ALPHABET[idx]));
    }
    ProfileCode::parse(&code).expect("generated code is never blank")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_have_prefix_and_length() {
        let code = generate_profile_code();
        assert!(code.as_str().starts_with(PROFILE_CODE_PREFIX));
        assert_eq!(code.as_str().len(), PROFILE_CODE_PREFIX.len() + SUFFIX_LEN);
    }

    #[test]
    fn generated_codes_are_canonical() {
        let code = generate_profile_code();
        // Parsing the printed form round-trips: already trimmed and upper.
        let reparsed = ProfileCode::parse(code.as_str()).unwrap();
        assert_eq!(reparsed, code);
    }
}
