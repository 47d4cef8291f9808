//! Identifier and token generation.

use rand::distr::Alphanumeric;
use rand::Rng;

/// A lowercase alphanumeric random token of `len` characters.
pub fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// `<prefix>-<unix millis>-<9 char token>`, e.g. `inquiry-1718000000000-k3j9x0a2b`.
pub fn timestamped_id(prefix: &str) -> String {
    format!(
        "{prefix}-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        random_token(9)
    )
}
