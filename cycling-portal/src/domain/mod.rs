//! Domain types for the cycling portal.
//!
//! Teams, riders, races, stages and segments, plus the validated values
//! they are built from. Entities refer to each other only by id; the
//! [`Portal`](crate::store::Portal) owns them all.

mod checkpoints;
mod error;
mod ids;
mod name;
mod race;
mod rider;
mod segment;
mod stage;
mod team;

pub use checkpoints::{Checkpoints, InvalidCheckpoints};
pub use error::{ErrorCategory, Lookup, PortalError};
pub use ids::{EntityKind, RaceId, RiderId, SegmentId, StageId, TeamId};
pub use name::{EntityName, InvalidName, MAX_NAME_CHARS};
pub use race::{Race, RaceDetails};
pub use rider::{MIN_YEAR_OF_BIRTH, Rider};
pub use segment::{Segment, SegmentType};
pub use stage::{MIN_STAGE_LENGTH_KM, Stage, StageState, StageType};
pub use team::Team;
