//! Riders and their stage results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Checkpoints, RiderId, StageId, TeamId};

/// Earliest accepted year of birth.
pub const MIN_YEAR_OF_BIRTH: i32 = 1900;

/// A rider, belonging to exactly one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rider {
    id: RiderId,
    team: TeamId,
    name: String,
    year_of_birth: i32,
    /// At most one result per stage.
    results: BTreeMap<StageId, Checkpoints>,
}

impl Rider {
    pub(crate) fn new(id: RiderId, team: TeamId, name: String, year_of_birth: i32) -> Self {
        Self {
            id,
            team,
            name,
            year_of_birth,
            results: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> RiderId {
        self.id
    }

    pub fn team(&self) -> TeamId {
        self.team
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn year_of_birth(&self) -> i32 {
        self.year_of_birth
    }

    /// The rider's result in `stage`, if one was registered.
    pub fn result(&self, stage: StageId) -> Option<&Checkpoints> {
        self.results.get(&stage)
    }

    /// Stages the rider has a result in, in id order.
    pub fn stages_with_results(&self) -> impl Iterator<Item = StageId> + '_ {
        self.results.keys().copied()
    }

    pub(crate) fn insert_result(&mut self, stage: StageId, checkpoints: Checkpoints) {
        self.results.insert(stage, checkpoints);
    }

    pub(crate) fn remove_result(&mut self, stage: StageId) -> Option<Checkpoints> {
        self.results.remove(&stage)
    }
}
