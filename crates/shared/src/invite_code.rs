//! Invite code generation.
//!
//! Codes are drawn uniformly from a configurable alphabet. No uniqueness check
//! is performed here; callers choose an alphabet and length that make
//! collisions negligible.

use rand::Rng;

/// Uppercase letters and digits without the look-alikes 0, O, 1 and I.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Default number of characters in a generated code.
pub const DEFAULT_LENGTH: usize = 8;

/// Longest code the `invite_codes.code` column can hold.
pub const MAX_LENGTH: usize = 32;

/// Generate a random code of `length` characters drawn from `alphabet`.
///
/// Returns an empty string when the alphabet is empty.
pub fn generate_code(alphabet: &str, length: usize) -> String {
    let chars: Vec<char> = alphabet.chars().collect();
    if chars.is_empty() {
        return String::new();
    }

    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect()
}

/// Returns true if `code` fits the storage column at all.
///
/// Alphabet and length are not checked, so codes issued under earlier
/// settings stay redeemable until they expire.
pub fn fits_storage(code: &str) -> bool {
    !code.is_empty() && code.chars().count() <= MAX_LENGTH
}
