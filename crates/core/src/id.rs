//! Normalized identifiers used across the domain.
//!
//! Customer and product identifiers are case-insensitive. Every identifier is
//! stored in its normalized (upper-cased) form, so `"abc123"` and `"ABC123"`
//! resolve to the same entity.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Canonicalize an identifier: every character mapped to its uppercase form.
///
/// No trimming and no length checks happen here.
pub fn normalize(id: &str) -> String {
    id.to_uppercase()
}

/// Characters that cannot appear in an identifier: the log delimiter, path
/// separators, line breaks and NUL.
const FORBIDDEN_ID_CHARS: &[char] = &['|', '/', '\\', '\n', '\r', '\0'];

/// Longest normalized identifier, in bytes. Customer ids name a review log
/// file, so they must stay well under common file-name limits.
pub const MAX_ID_LEN: usize = 200;

/// Identifier of a registered customer (normalized).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

/// Identifier of a catalog product (normalized).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

macro_rules! impl_normalized_id {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Build an identifier from raw user input, normalizing it.
            ///
            /// This never fails; use `str::parse` when the identifier is about to be
            /// stored and must be validated.
            pub fn new(raw: &str) -> Self {
                Self(normalize(raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.is_empty() {
                    return Err(DomainError::validation(format!("{} cannot be empty", $name)));
                }
                if let Some(c) = s.chars().find(|c| FORBIDDEN_ID_CHARS.contains(c)) {
                    return Err(DomainError::validation(format!(
                        "{} contains forbidden character {:?}",
                        $name, c
                    )));
                }
                let id = Self::new(s);
                if id.0.len() > MAX_ID_LEN {
                    return Err(DomainError::validation(format!(
                        "{} is longer than {} bytes",
                        $name, MAX_ID_LEN
                    )));
                }
                Ok(id)
            }
        }
    };
}

impl_normalized_id!(CustomerId, "CustomerId");
impl_normalized_id!(ProductId, "ProductId");
