//! Checked random identifiers for vendors and purchase orders.
//!
//! Candidates are 12 characters drawn from `[A-Za-z0-9]` using the operating
//! system's CSPRNG. Each candidate is checked against the owning table before it is
//! handed out; nothing is reserved, so the caller's insert is the first write.

use crate::errors::ServiceError;
use metrics::counter;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use std::future::Future;
use tracing::debug;

/// Length of every generated identifier
pub const ID_LENGTH: usize = 12;

/// Draws one candidate identifier
pub fn random_id() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(char::from)
        .collect()
}

/// True when `value` has the shape of a generated identifier
pub fn is_well_formed(value: &str) -> bool {
    value.len() == ID_LENGTH && value.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Returns the first candidate for which `exists` answers `false`.
///
/// There is no retry bound: with 62^12 possible values a collision is already rare.
pub async fn generate_id<F, Fut>(mut exists: F) -> Result<String, ServiceError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, ServiceError>>,
{
    loop {
        let candidate = random_id();
        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }
        counter!("vendor_po.id.collisions", 1);
        debug!(candidate = %candidate, "generated identifier already in use, drawing again");
    }
}
