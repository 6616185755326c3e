//! Teams.

use serde::{Deserialize, Serialize};

use super::{EntityName, RiderId, TeamId};

/// A team and the riders it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    name: EntityName,
    description: String,
    riders: Vec<RiderId>,
}

impl Team {
    pub(crate) fn new(id: TeamId, name: EntityName, description: String) -> Self {
        Self {
            id,
            name,
            description,
            riders: Vec::new(),
        }
    }

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn name(&self) -> &EntityName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Riders in the order they joined.
    pub fn riders(&self) -> &[RiderId] {
        &self.riders
    }

    pub(crate) fn add_rider(&mut self, rider: RiderId) {
        self.riders.push(rider);
    }

    pub(crate) fn remove_rider(&mut self, rider: RiderId) {
        self.riders.retain(|r| *r != rider);
    }
}
