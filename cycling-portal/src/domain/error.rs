//! Portal error types.
//!
//! Every failed store operation or classification query reports one of
//! these. They are distinct from persistence (IO/JSON) errors.

use std::fmt;

use super::{EntityKind, InvalidCheckpoints, InvalidName, RiderId, StageId, StageState};

/// How an entity was looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(u32),
    Name(String),
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Id(id) => write!(f, "id {id}"),
            Lookup::Name(name) => write!(f, "name {name:?}"),
        }
    }
}

/// Broad class of a [`PortalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// An id or name does not resolve.
    UnknownEntity,
    /// A name, length, year of birth or location is out of policy.
    InvalidArgument,
    /// The request conflicts with current state.
    IllegalState,
    /// Result data does not fit the stage.
    InvalidInput,
}

/// Errors from portal operations and classification queries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortalError {
    /// No entity with this id or name
    #[error("unknown {kind}: {lookup}")]
    UnknownEntity { kind: EntityKind, lookup: Lookup },

    /// Argument outside the accepted range
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Another entity of the same kind already has this name
    #[error("a {kind} named {name:?} already exists")]
    DuplicateName { kind: EntityKind, name: String },

    /// The rider already has a result in the stage
    #[error("rider {rider} already has a result in stage {stage}")]
    DuplicateResult { stage: StageId, rider: RiderId },

    /// The stage is in the wrong lifecycle state for the operation
    #[error("stage {stage} is in state {state}")]
    WrongStageState { stage: StageId, state: StageState },

    /// Time trials cannot contain segments
    #[error("stage {0} is a time trial and cannot have segments")]
    TimeTrialSegment(StageId),

    /// Checkpoint count does not match the stage's segments
    #[error("expected {expected} checkpoints for stage {stage}, got {actual}")]
    CheckpointCount {
        stage: StageId,
        expected: usize,
        actual: usize,
    },

    /// Checkpoints cannot form a result at all
    #[error(transparent)]
    InvalidCheckpoints(#[from] InvalidCheckpoints),
}

impl PortalError {
    pub(crate) fn unknown_id(kind: EntityKind, id: u32) -> Self {
        PortalError::UnknownEntity {
            kind,
            lookup: Lookup::Id(id),
        }
    }

    pub(crate) fn unknown_name(kind: EntityKind, name: &str) -> Self {
        PortalError::UnknownEntity {
            kind,
            lookup: Lookup::Name(name.to_string()),
        }
    }

    /// Which class of failure this is.
    pub fn category(&self) -> ErrorCategory {
        match self {
            PortalError::UnknownEntity { .. } => ErrorCategory::UnknownEntity,
            PortalError::InvalidArgument(_) => ErrorCategory::InvalidArgument,
            PortalError::DuplicateName { .. }
            | PortalError::DuplicateResult { .. }
            | PortalError::WrongStageState { .. }
            | PortalError::TimeTrialSegment(_) => ErrorCategory::IllegalState,
            PortalError::CheckpointCount { .. } | PortalError::InvalidCheckpoints(_) => {
                ErrorCategory::InvalidInput
            }
        }
    }
}

impl From<InvalidName> for PortalError {
    fn from(err: InvalidName) -> Self {
        PortalError::InvalidArgument(err.reason())
    }
}
