//! Races.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EntityName, RaceId, StageId};

/// A staged race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
    id: RaceId,
    name: EntityName,
    description: String,
    /// Race order is insertion order.
    stages: Vec<StageId>,
}

impl Race {
    pub(crate) fn new(id: RaceId, name: EntityName, description: String) -> Self {
        Self {
            id,
            name,
            description,
            stages: Vec::new(),
        }
    }

    pub fn id(&self) -> RaceId {
        self.id
    }

    pub fn name(&self) -> &EntityName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Stage ids in race order.
    pub fn stages(&self) -> &[StageId] {
        &self.stages
    }

    pub(crate) fn add_stage(&mut self, stage: StageId) {
        self.stages.push(stage);
    }

    pub(crate) fn remove_stage(&mut self, stage: StageId) {
        self.stages.retain(|s| *s != stage);
    }
}

/// Summary of a race for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceDetails {
    pub id: RaceId,
    pub name: String,
    pub description: String,
    pub stage_count: usize,
    /// Sum of all stage lengths.
    pub total_length_km: f64,
}

impl fmt::Display for RaceDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Race {} \"{}\": {} ({} stages, {:.1} km)",
            self.id, self.name, self.description, self.stage_count, self.total_length_km
        )
    }
}
