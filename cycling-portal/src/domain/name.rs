//! Validated entity names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of characters in a team, race or stage name.
pub const MAX_NAME_CHARS: usize = 30;

/// Error returned when a team, race or stage name fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid name: {reason}")]
pub struct InvalidName {
    reason: &'static str,
}

impl InvalidName {
    /// Why the name was rejected.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// A non-empty name of at most 30 characters.
///
/// Teams, races and stages are all named with this type. Uniqueness is a
/// property of the collection holding the entity, so it is checked by the
/// store rather than here.
///
/// # Examples
///
/// ```
/// use cycling_portal::domain::EntityName;
///
/// let name = EntityName::parse("Tour de Test").unwrap();
/// assert_eq!(name.as_str(), "Tour de Test");
///
/// assert!(EntityName::parse("").is_err());
/// assert!(EntityName::parse(&"x".repeat(31)).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityName(String);

impl EntityName {
    /// Parse a name, counting characters rather than bytes.
    pub fn parse(s: &str) -> Result<Self, InvalidName> {
        if s.is_empty() {
            return Err(InvalidName {
                reason: "name cannot be empty",
            });
        }

        if s.chars().count() > MAX_NAME_CHARS {
            return Err(InvalidName {
                reason: "name must be at most 30 characters",
            });
        }

        Ok(EntityName(s.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name and returns the inner String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for EntityName {
    type Error = InvalidName;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<EntityName> for String {
    fn from(name: EntityName) -> Self {
        name.0
    }
}

impl PartialEq<str> for EntityName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Debug for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityName({})", self.0)
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
