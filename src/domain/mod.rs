//! Domain primitives for the facility directory.
//!
//! Identifiers follow the Newtype pattern so a history id can never be passed
//! where a facility id is expected. All ids are UUID strings generated by the
//! store on insert.

pub mod location;

pub use location::Coordinates;

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id!(
    /// Internal identifier of a stored facility.
    ///
    /// ```rust
    /// use healthfinder::domain::FacilityId;
    ///
    /// let id = FacilityId::from("abc");
    /// assert_eq!(id.as_str(), "abc");
    /// assert_eq!(id.to_string(), "abc");
    /// ```
    FacilityId
);

string_id!(
    /// Internal identifier of a search history entry.
    HistoryId
);

string_id!(UserId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = FacilityId::generate();
        let b = FacilityId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = HistoryId::from("entry-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"entry-1\"");
        let back: HistoryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
