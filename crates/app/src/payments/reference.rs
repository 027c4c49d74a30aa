//! Payment references.

use std::fmt;

use jiff::Timestamp;
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};

use crate::auth::encode_hex;

const REFERENCE_PREFIX: &str = "chk";
const REFERENCE_RANDOM_BYTES: usize = 8;

/// Opaque token correlating one checkout attempt across the gateway and the
/// order repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentReference(String);

impl PaymentReference {
    /// Generate a fresh reference: a millisecond timestamp followed by random hex.
    #[must_use]
    pub fn generate() -> Self {
        let mut random = [0_u8; REFERENCE_RANDOM_BYTES];

        OsRng.fill_bytes(&mut random);

        Self(format!(
            "{REFERENCE_PREFIX}_{}_{}",
            Timestamp::now().as_millisecond(),
            encode_hex(&random)
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for PaymentReference {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PaymentReference {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
