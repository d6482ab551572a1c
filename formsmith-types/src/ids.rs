//! Identifier types used throughout formsmith.
//!
//! Fresh identifiers are UUID v7 strings so they sort by creation time.
//! Identifiers read from stored documents are kept verbatim: older documents
//! carry ids that are not UUIDs at all, and they must survive a load/save
//! cycle unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new, globally unique identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Wraps an existing identifier string without validation.
            #[must_use]
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Parses an identifier, rejecting empty or whitespace-only input.
            pub fn parse(s: &str) -> crate::Result<Self> {
                if s.trim().is_empty() {
                    return Err(crate::Error::InvalidId(s.to_string()));
                }
                Ok(Self(s.to_string()))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = crate::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Identifier of a row within a form document.
    RowId
}

string_id! {
    /// Identifier of a column within a row.
    ColumnId
}

string_id! {
    /// Identifier of a field. Unique across the whole document.
    FieldId
}

string_id! {
    /// Identifier the persistence layer assigns to a saved form.
    FormId
}
