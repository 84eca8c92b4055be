//! Patient identifier validation.
//!
//! Input is trimmed before any check. Identifiers that fail validation never
//! reach the network.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Longest identifier accepted under [`IdPolicy::Strict`].
pub const MAX_STRICT_LEN: usize = 20;

/// How strictly identifiers are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// ASCII letters and digits only, 1 to 20 characters.
    #[default]
    Strict,
    /// Any non-empty string.
    Lenient,
}

/// A trimmed, validated patient identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
    pub fn parse(raw: &str, policy: IdPolicy) -> Result<Self> {
        let id = raw.trim();
        if id.is_empty() {
            return Err(Error::invalid_identifier("Please enter a Patient ID"));
        }
        if policy == IdPolicy::Strict {
            if id.chars().count() > MAX_STRICT_LEN {
                return Err(Error::invalid_identifier(format!(
                    "Patient ID must be at most {MAX_STRICT_LEN} characters"
                )));
            }
            if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(Error::invalid_identifier(
                    "Patient ID must contain only letters and numbers",
                ));
            }
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
