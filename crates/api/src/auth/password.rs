//! Password hashing, verification, and generation.
//!
//! Passwords are hashed with HMAC-SHA512: a random 128-byte key acts as the
//! per-user salt and the 64-byte MAC over the password is the stored hash.
//! Both are persisted hex-encoded. Generated passwords (for admin-created
//! accounts) mix upper, lower, and digit alphabets that avoid ambiguous
//! glyphs like `I` and `l`.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Length in bytes of the random HMAC key used as salt.
const SALT_LENGTH: usize = 128;
/// Length in bytes of an HMAC-SHA512 output.
const HASH_LENGTH: usize = 64;

/// Alphabets sampled by [`generate_password`]. Ambiguous glyphs are omitted.
const PASSWORD_ALPHABETS: [&str; 3] = [
    "ABCDEFGHJKLMNOPQRSTUVWXYZ",
    "abcdefghijkmnopqrstuvwxyz",
    "0123456789",
];

/// Hash a password with a freshly generated salt.
///
/// Returns `(hash_hex, salt_hex)` ready for persistence.
pub fn create_password_hash(password: &str) -> (String, String) {
    let mut salt = [0u8; SALT_LENGTH];
    rand::rng().fill(&mut salt[..]);

    let mut mac =
        HmacSha512::new_from_slice(&salt).expect("HMAC accepts keys of any length");
    mac.update(password.as_bytes());
    let hash = mac.finalize().into_bytes();

    (encode_hex(&hash), encode_hex(&salt))
}

/// Verify a password against a stored hash and salt.
///
/// Returns `false` on any mismatch, including malformed hex or wrong lengths.
/// The final comparison is constant-time.
pub fn verify_password(password: &str, stored_hash_hex: &str, stored_salt_hex: &str) -> bool {
    let Some(salt) = decode_hex(stored_salt_hex) else {
        return false;
    };
    let Some(hash) = decode_hex(stored_hash_hex) else {
        return false;
    };
    if salt.len() != SALT_LENGTH || hash.len() != HASH_LENGTH {
        return false;
    }

    let mut mac =
        HmacSha512::new_from_slice(&salt).expect("HMAC accepts keys of any length");
    mac.update(password.as_bytes());
    mac.verify_slice(&hash).is_ok()
}

/// Generate a random password for admin-created accounts.
///
/// Characters are inserted one at a time at random positions until the
/// password is at least 10 characters long and contains at least 8 distinct
/// characters.
pub fn generate_password() -> String {
    let mut rng = rand::rng();
    let mut chars: Vec<char> = Vec::new();

    while chars.len() < 10 || distinct_count(&chars) < 8 {
        let alphabet = PASSWORD_ALPHABETS[rng.random_range(0..PASSWORD_ALPHABETS.len())];
        let glyph = alphabet.as_bytes()[rng.random_range(0..alphabet.len())] as char;
        let position = rng.random_range(0..chars.len().max(1));
        chars.insert(position, glyph);
    }

    chars.into_iter().collect()
}

fn distinct_count(chars: &[char]) -> usize {
    let mut seen = std::collections::HashSet::new();
    chars.iter().filter(|c| seen.insert(**c)).count()
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}
