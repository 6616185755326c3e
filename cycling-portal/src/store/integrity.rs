//! Cross-entity consistency of a deserialized portal.
//!
//! Store operations keep these relations in step; a portal read from a file
//! could break any of them, so loading checks them all before handing the
//! portal out.

use std::collections::BTreeMap;
use std::fmt;

use super::Portal;
use crate::domain::{EntityKind, StageState};

/// A relation between entities that does not hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("inconsistent portal: {0}")]
pub struct Inconsistency(String);

impl Inconsistency {
    pub fn message(&self) -> &str {
        &self.0
    }
}

fn fail<T>(message: String) -> Result<T, Inconsistency> {
    Err(Inconsistency(message))
}

/// Each entity must be stored under its own id.
fn check_keys<K, V>(
    kind: EntityKind,
    map: &BTreeMap<K, V>,
    id_of: impl Fn(&V) -> K,
) -> Result<(), Inconsistency>
where
    K: Copy + Eq + fmt::Display,
{
    for (key, value) in map {
        let id = id_of(value);
        if id != *key {
            return fail(format!("{kind} stored under id {key} has id {id}"));
        }
    }
    Ok(())
}

impl Portal {
    /// Check every id reference, back-reference and result shape.
    pub(crate) fn check_integrity(&self) -> Result<(), Inconsistency> {
        check_keys(EntityKind::Team, &self.teams, |t| t.id())?;
        check_keys(EntityKind::Rider, &self.riders, |r| r.id())?;
        check_keys(EntityKind::Race, &self.races, |r| r.id())?;
        check_keys(EntityKind::Stage, &self.stages, |s| s.id())?;
        check_keys(EntityKind::Segment, &self.segments, |s| s.id())?;

        for team in self.teams.values() {
            for rider in team.riders() {
                if self.riders.get(rider).is_none_or(|r| r.team() != team.id()) {
                    return fail(format!("team {} lists rider {rider} it does not own", team.id()));
                }
            }
        }

        for rider in self.riders.values() {
            if self
                .teams
                .get(&rider.team())
                .is_none_or(|t| !t.riders().contains(&rider.id()))
            {
                return fail(format!("rider {} is not listed by team {}", rider.id(), rider.team()));
            }
            for stage_id in rider.stages_with_results() {
                let Some(stage) = self.stages.get(&stage_id) else {
                    return fail(format!("rider {} has a result in missing stage {stage_id}", rider.id()));
                };
                if stage.state() != StageState::WaitingForResults {
                    return fail(format!("stage {stage_id} has results but is still in setup"));
                }
                let actual = rider.result(stage_id).map_or(0, |c| c.len());
                if actual != stage.expected_checkpoints() {
                    return fail(format!(
                        "rider {} has {actual} checkpoints in stage {stage_id}, expected {}",
                        rider.id(),
                        stage.expected_checkpoints()
                    ));
                }
            }
        }

        for race in self.races.values() {
            for stage in race.stages() {
                if self.stages.get(stage).is_none_or(|s| s.race() != race.id()) {
                    return fail(format!("race {} lists stage {stage} it does not own", race.id()));
                }
            }
        }

        for stage in self.stages.values() {
            if self
                .races
                .get(&stage.race())
                .is_none_or(|r| !r.stages().contains(&stage.id()))
            {
                return fail(format!("stage {} is not listed by race {}", stage.id(), stage.race()));
            }
            for segment in stage.segments() {
                if self.segments.get(segment).is_none_or(|s| s.stage() != stage.id()) {
                    return fail(format!("stage {} lists segment {segment} it does not own", stage.id()));
                }
            }
        }

        for segment in self.segments.values() {
            if self
                .stages
                .get(&segment.stage())
                .is_none_or(|s| !s.segments().contains(&segment.id()))
            {
                return fail(format!(
                    "segment {} is not listed by stage {}",
                    segment.id(),
                    segment.stage()
                ));
            }
        }

        Ok(())
    }
}
