//! Typed identifiers for the entities tracked by the engine.
//!
//! Every identifier wraps a [`Uuid`] and serializes transparently as its
//! hyphenated string form, so `"0f8fad5b-d9cb-469f-a165-70867728950e"` in JSON
//! or in a URL path deserializes straight into the right id type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the wrapped UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

typed_id!(
    /// Unique identifier of an [`Employee`](super::Employee).
    EmployeeId
);

typed_id!(
    /// Unique identifier of a [`Team`](super::Team).
    TeamId
);

typed_id!(
    /// Unique identifier of a [`Vacation`](super::Vacation).
    VacationId
);
