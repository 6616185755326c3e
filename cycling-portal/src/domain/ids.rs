//! Entity identifiers.
//!
//! Every entity collection hands out its own identifier type, so a
//! `StageId` can never be passed where a `RiderId` is expected. Identifiers
//! are positive and assigned as max-existing + 1.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Returns the raw identifier.
            pub fn get(self) -> u32 {
                self.0
            }

            /// The identifier following the largest one currently in use.
            pub(crate) fn next_after(last: Option<Self>) -> Self {
                Self(last.map_or(1, |id| id.0 + 1))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifies a [`Team`](super::Team).
    TeamId
);
entity_id!(
    /// Identifies a [`Rider`](super::Rider).
    RiderId
);
entity_id!(
    /// Identifies a [`Race`](super::Race).
    RaceId
);
entity_id!(
    /// Identifies a [`Stage`](super::Stage).
    StageId
);
entity_id!(
    /// Identifies a [`Segment`](super::Segment).
    SegmentId
);

/// The kind of entity an identifier or name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Team,
    Rider,
    Race,
    Stage,
    Segment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Team => "team",
            EntityKind::Rider => "rider",
            EntityKind::Race => "race",
            EntityKind::Stage => "stage",
            EntityKind::Segment => "segment",
        })
    }
}
