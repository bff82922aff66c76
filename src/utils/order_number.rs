//! Public order number generation.

use rand::Rng;

/// Prefix of every order number.
pub const ORDER_NUMBER_PREFIX: &str = "ORD-";

/// Uppercase letters and digits without look-alikes (0/O, 1/I/L).
const CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Random characters after the prefix.
const SUFFIX_LEN: usize = 10;

/// Generates a random order number such as `ORD-7KQ2MZX9PA`.
///
/// Uniqueness is enforced by the database; callers retry on collision.
pub fn generate_order_number() -> String {
    let mut rng = rand::rng();

    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();

    format!("{ORDER_NUMBER_PREFIX}{suffix}")
}

/// Checks the shape of an order number without touching the database.
pub fn is_order_number(candidate: &str) -> bool {
    candidate
        .strip_prefix(ORDER_NUMBER_PREFIX)
        .is_some_and(|s| s.len() == SUFFIX_LEN && s.bytes().all(|b| CHARSET.contains(&b)))
}
