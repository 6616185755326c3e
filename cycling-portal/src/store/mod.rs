//! The portal store.
//!
//! `Portal` owns every team, rider, race, stage and segment. Entities are
//! kept in id-ordered maps and refer to each other only by id. Each
//! mutating operation validates everything up front, so a failed call
//! leaves the store exactly as it was.

mod integrity;
mod persist;

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classification::{ClassificationConfig, Classifier, PortalView};
use crate::domain::{
    Checkpoints, EntityKind, EntityName, MIN_STAGE_LENGTH_KM, MIN_YEAR_OF_BIRTH, PortalError,
    Race, RaceDetails, RaceId, Rider, RiderId, Segment, SegmentId, SegmentType, Stage, StageId,
    StageState, StageType, Team, TeamId,
};

pub use integrity::Inconsistency;
pub use persist::{FORMAT_VERSION, PersistConfig, PersistError, PortalFile};

/// In-memory store of all portal entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    teams: BTreeMap<TeamId, Team>,
    riders: BTreeMap<RiderId, Rider>,
    races: BTreeMap<RaceId, Race>,
    stages: BTreeMap<StageId, Stage>,
    segments: BTreeMap<SegmentId, Segment>,
}

impl Portal {
    /// Create an empty portal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every entity.
    pub fn erase(&mut self) {
        *self = Self::default();
        debug!("erased portal");
    }

    /// A classifier over this portal with the default configuration.
    pub fn classifier(&self) -> Classifier<'_, Portal> {
        Classifier::new(self)
    }

    /// A classifier over this portal with a custom configuration.
    pub fn classifier_with(&self, config: ClassificationConfig) -> Classifier<'_, Portal> {
        Classifier::with_config(self, config)
    }

    // ========== lookups ==========

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(&id)
    }

    pub fn rider(&self, id: RiderId) -> Option<&Rider> {
        self.riders.get(&id)
    }

    pub fn race(&self, id: RaceId) -> Option<&Race> {
        self.races.get(&id)
    }

    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.get(&id)
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(&id)
    }

    fn require_team(&self, id: TeamId) -> Result<&Team, PortalError> {
        self.team(id)
            .ok_or_else(|| PortalError::unknown_id(EntityKind::Team, id.get()))
    }

    fn require_rider(&self, id: RiderId) -> Result<&Rider, PortalError> {
        self.rider(id)
            .ok_or_else(|| PortalError::unknown_id(EntityKind::Rider, id.get()))
    }

    fn require_race(&self, id: RaceId) -> Result<&Race, PortalError> {
        self.race(id)
            .ok_or_else(|| PortalError::unknown_id(EntityKind::Race, id.get()))
    }

    fn require_stage(&self, id: StageId) -> Result<&Stage, PortalError> {
        self.stage(id)
            .ok_or_else(|| PortalError::unknown_id(EntityKind::Stage, id.get()))
    }

    fn require_segment(&self, id: SegmentId) -> Result<&Segment, PortalError> {
        self.segment(id)
            .ok_or_else(|| PortalError::unknown_id(EntityKind::Segment, id.get()))
    }

    // ========== teams ==========

    /// Create a team. Team names are unique.
    pub fn create_team(&mut self, name: &str, description: &str) -> Result<TeamId, PortalError> {
        let name = EntityName::parse(name)?;
        if self.teams.values().any(|t| t.name() == &name) {
            return Err(PortalError::DuplicateName {
                kind: EntityKind::Team,
                name: name.into_inner(),
            });
        }

        let id = TeamId::next_after(self.teams.keys().next_back().copied());
        debug!(team = %id, name = %name, "created team");
        self.teams
            .insert(id, Team::new(id, name, description.to_string()));
        Ok(id)
    }

    /// Remove a team together with its riders and their results.
    pub fn remove_team(&mut self, id: TeamId) -> Result<(), PortalError> {
        let riders = self.require_team(id)?.riders().to_vec();
        for rider in &riders {
            self.riders.remove(rider);
        }
        self.teams.remove(&id);
        debug!(team = %id, riders = riders.len(), "removed team");
        Ok(())
    }

    /// All team ids in ascending order.
    pub fn team_ids(&self) -> Vec<TeamId> {
        self.teams.keys().copied().collect()
    }

    /// Riders of a team in the order they joined.
    pub fn team_riders(&self, id: TeamId) -> Result<&[RiderId], PortalError> {
        Ok(self.require_team(id)?.riders())
    }

    // ========== riders ==========

    /// Create a rider in a team.
    pub fn create_rider(
        &mut self,
        team: TeamId,
        name: &str,
        year_of_birth: i32,
    ) -> Result<RiderId, PortalError> {
        self.require_team(team)?;
        if name.is_empty() {
            return Err(PortalError::InvalidArgument("rider name cannot be empty"));
        }
        if year_of_birth < MIN_YEAR_OF_BIRTH {
            return Err(PortalError::InvalidArgument(
                "year of birth must be 1900 or later",
            ));
        }

        let id = RiderId::next_after(self.riders.keys().next_back().copied());
        self.riders
            .insert(id, Rider::new(id, team, name.to_string(), year_of_birth));
        if let Some(t) = self.teams.get_mut(&team) {
            t.add_rider(id);
        }
        debug!(rider = %id, team = %team, "created rider");
        Ok(id)
    }

    /// Remove a rider and all of their results.
    pub fn remove_rider(&mut self, id: RiderId) -> Result<(), PortalError> {
        let team = self.require_rider(id)?.team();
        self.riders.remove(&id);
        if let Some(t) = self.teams.get_mut(&team) {
            t.remove_rider(id);
        }
        debug!(rider = %id, "removed rider");
        Ok(())
    }

    /// All rider ids in ascending order.
    pub fn rider_ids(&self) -> Vec<RiderId> {
        self.riders.keys().copied().collect()
    }

    // ========== races ==========

    /// Create a race. Race names are unique.
    pub fn create_race(&mut self, name: &str, description: &str) -> Result<RaceId, PortalError> {
        let name = EntityName::parse(name)?;
        if self.races.values().any(|r| r.name() == &name) {
            return Err(PortalError::DuplicateName {
                kind: EntityKind::Race,
                name: name.into_inner(),
            });
        }

        let id = RaceId::next_after(self.races.keys().next_back().copied());
        debug!(race = %id, name = %name, "created race");
        self.races
            .insert(id, Race::new(id, name, description.to_string()));
        Ok(id)
    }

    /// All race ids in ascending order.
    pub fn race_ids(&self) -> Vec<RaceId> {
        self.races.keys().copied().collect()
    }

    /// Summary of a race, with the total length of its stages.
    pub fn view_race_details(&self, id: RaceId) -> Result<RaceDetails, PortalError> {
        let race = self.require_race(id)?;
        let total_length_km = race
            .stages()
            .iter()
            .filter_map(|s| self.stage(*s))
            .map(Stage::length_km)
            .sum();

        Ok(RaceDetails {
            id,
            name: race.name().to_string(),
            description: race.description().to_string(),
            stage_count: race.stages().len(),
            total_length_km,
        })
    }

    /// Stage ids of a race in race order.
    pub fn race_stages(&self, id: RaceId) -> Result<&[StageId], PortalError> {
        Ok(self.require_race(id)?.stages())
    }

    pub fn number_of_stages(&self, id: RaceId) -> Result<usize, PortalError> {
        Ok(self.require_race(id)?.stages().len())
    }

    /// Remove a race with its stages, their segments and all results in them.
    pub fn remove_race_by_id(&mut self, id: RaceId) -> Result<(), PortalError> {
        let stages = self.require_race(id)?.stages().to_vec();
        for stage in &stages {
            self.purge_stage(*stage);
        }
        self.races.remove(&id);
        debug!(race = %id, stages = stages.len(), "removed race");
        Ok(())
    }

    /// Remove a race looked up by name. See [`Portal::remove_race_by_id`].
    pub fn remove_race_by_name(&mut self, name: &str) -> Result<(), PortalError> {
        let id = self
            .races
            .values()
            .find(|r| r.name() == name)
            .map(Race::id)
            .ok_or_else(|| PortalError::unknown_name(EntityKind::Race, name))?;
        self.remove_race_by_id(id)
    }

    // ========== stages ==========

    /// Append a new stage to a race. Stage names are unique across races.
    pub fn add_stage_to_race(
        &mut self,
        race: RaceId,
        name: &str,
        description: &str,
        length_km: f64,
        start: NaiveDateTime,
        stage_type: StageType,
    ) -> Result<StageId, PortalError> {
        self.require_race(race)?;
        let name = EntityName::parse(name)?;
        if self.stages.values().any(|s| s.name() == &name) {
            return Err(PortalError::DuplicateName {
                kind: EntityKind::Stage,
                name: name.into_inner(),
            });
        }
        // Also rejects NaN.
        if !(length_km >= MIN_STAGE_LENGTH_KM) {
            return Err(PortalError::InvalidArgument(
                "stage length must be at least 5 km",
            ));
        }

        let id = StageId::next_after(self.stages.keys().next_back().copied());
        debug!(stage = %id, race = %race, name = %name, %stage_type, "created stage");
        self.stages.insert(
            id,
            Stage::new(
                id,
                race,
                name,
                description.to_string(),
                length_km,
                stage_type,
                start,
            ),
        );
        if let Some(r) = self.races.get_mut(&race) {
            r.add_stage(id);
        }
        Ok(id)
    }

    pub fn stage_length(&self, id: StageId) -> Result<f64, PortalError> {
        Ok(self.require_stage(id)?.length_km())
    }

    /// Segment ids of a stage ordered by location.
    pub fn stage_segments(&self, id: StageId) -> Result<&[SegmentId], PortalError> {
        Ok(self.require_stage(id)?.segments())
    }

    /// Remove a stage, its segments and all results in it.
    pub fn remove_stage_by_id(&mut self, id: StageId) -> Result<(), PortalError> {
        let race = self.require_stage(id)?.race();
        if let Some(r) = self.races.get_mut(&race) {
            r.remove_stage(id);
        }
        self.purge_stage(id);
        debug!(stage = %id, "removed stage");
        Ok(())
    }

    /// Move a stage from setup to waiting for results.
    pub fn conclude_stage_preparation(&mut self, id: StageId) -> Result<(), PortalError> {
        let stage = self.require_stage(id)?;
        if stage.state() == StageState::WaitingForResults {
            return Err(PortalError::WrongStageState {
                stage: id,
                state: stage.state(),
            });
        }

        if let Some(s) = self.stages.get_mut(&id) {
            s.set_state(StageState::WaitingForResults);
        }
        debug!(stage = %id, "concluded stage preparation");
        Ok(())
    }

    /// Drop a stage, its segments and every result in it. Does not touch
    /// the owning race's stage list.
    fn purge_stage(&mut self, id: StageId) {
        if let Some(stage) = self.stages.remove(&id) {
            for segment in stage.segments() {
                self.segments.remove(segment);
            }
        }
        for rider in self.riders.values_mut() {
            rider.remove_result(id);
        }
    }

    // ========== segments ==========

    /// Add a categorised climb to a stage in setup.
    pub fn add_categorized_climb(
        &mut self,
        stage: StageId,
        location_km: f64,
        segment_type: SegmentType,
        average_gradient: f64,
        length_km: f64,
    ) -> Result<SegmentId, PortalError> {
        let position = self.segment_position(stage, location_km)?;
        if !segment_type.is_climb() {
            return Err(PortalError::InvalidArgument(
                "a categorized climb cannot be a sprint",
            ));
        }

        let id = SegmentId::next_after(self.segments.keys().next_back().copied());
        self.insert_segment(
            position,
            Segment::climb(
                id,
                stage,
                segment_type,
                location_km,
                average_gradient,
                length_km,
            ),
        );
        Ok(id)
    }

    /// Add an intermediate sprint to a stage in setup.
    pub fn add_intermediate_sprint(
        &mut self,
        stage: StageId,
        location_km: f64,
    ) -> Result<SegmentId, PortalError> {
        let position = self.segment_position(stage, location_km)?;

        let id = SegmentId::next_after(self.segments.keys().next_back().copied());
        self.insert_segment(position, Segment::sprint(id, stage, location_km));
        Ok(id)
    }

    /// Remove a segment from a stage that is still in setup.
    pub fn remove_segment(&mut self, id: SegmentId) -> Result<(), PortalError> {
        let stage_id = self.require_segment(id)?.stage();
        let stage = self.require_stage(stage_id)?;
        if stage.state() != StageState::Setup {
            return Err(PortalError::WrongStageState {
                stage: stage_id,
                state: stage.state(),
            });
        }

        self.segments.remove(&id);
        if let Some(s) = self.stages.get_mut(&stage_id) {
            s.remove_segment(id);
        }
        debug!(segment = %id, stage = %stage_id, "removed segment");
        Ok(())
    }

    /// Validate a new segment and find where it goes in the stage's
    /// location order. Segments at equal locations keep insertion order.
    fn segment_position(&self, stage_id: StageId, location_km: f64) -> Result<usize, PortalError> {
        let stage = self.require_stage(stage_id)?;
        if stage.state() != StageState::Setup {
            return Err(PortalError::WrongStageState {
                stage: stage_id,
                state: stage.state(),
            });
        }
        if stage.stage_type().is_time_trial() {
            return Err(PortalError::TimeTrialSegment(stage_id));
        }
        if !(0.0..=stage.length_km()).contains(&location_km) {
            return Err(PortalError::InvalidArgument(
                "segment location must lie within the stage",
            ));
        }

        let position = stage
            .segments()
            .iter()
            .position(|s| {
                self.segment(*s)
                    .is_some_and(|seg| seg.location_km() > location_km)
            })
            .unwrap_or(stage.segments().len());
        Ok(position)
    }

    fn insert_segment(&mut self, position: usize, segment: Segment) {
        let (id, stage_id) = (segment.id(), segment.stage());
        debug!(segment = %id, stage = %stage_id, kind = %segment.segment_type(), "created segment");
        self.segments.insert(id, segment);
        if let Some(s) = self.stages.get_mut(&stage_id) {
            s.insert_segment(position, id);
        }
    }

    // ========== results ==========

    /// Record a rider's checkpoint times in a stage.
    ///
    /// The stage must be waiting for results and the rider must not already
    /// have a result there. `checkpoints` holds the start, one time per
    /// segment in location order, and the finish.
    pub fn register_rider_results(
        &mut self,
        stage: StageId,
        rider: RiderId,
        checkpoints: Vec<NaiveTime>,
    ) -> Result<(), PortalError> {
        let r = self.require_rider(rider)?;
        let s = self.require_stage(stage)?;
        if r.result(stage).is_some() {
            return Err(PortalError::DuplicateResult { stage, rider });
        }
        if s.state() != StageState::WaitingForResults {
            return Err(PortalError::WrongStageState {
                stage,
                state: s.state(),
            });
        }
        if checkpoints.len() != s.expected_checkpoints() {
            return Err(PortalError::CheckpointCount {
                stage,
                expected: s.expected_checkpoints(),
                actual: checkpoints.len(),
            });
        }
        let checkpoints = Checkpoints::new(checkpoints)?;

        if let Some(r) = self.riders.get_mut(&rider) {
            r.insert_result(stage, checkpoints);
        }
        debug!(stage = %stage, rider = %rider, "registered result");
        Ok(())
    }

    /// A rider's raw checkpoint times in a stage, if registered.
    pub fn rider_results(
        &self,
        stage: StageId,
        rider: RiderId,
    ) -> Result<Option<&[NaiveTime]>, PortalError> {
        self.require_stage(stage)?;
        Ok(self
            .require_rider(rider)?
            .result(stage)
            .map(Checkpoints::as_slice))
    }

    /// Delete a rider's result in a stage. Deleting a missing result is a
    /// no-op.
    pub fn delete_rider_results(&mut self, stage: StageId, rider: RiderId) -> Result<(), PortalError> {
        self.require_stage(stage)?;
        self.require_rider(rider)?;
        if let Some(r) = self.riders.get_mut(&rider)
            && r.remove_result(stage).is_some()
        {
            debug!(stage = %stage, rider = %rider, "deleted result");
        }
        Ok(())
    }
}

impl PortalView for Portal {
    fn race(&self, id: RaceId) -> Option<&Race> {
        Portal::race(self, id)
    }

    fn stage(&self, id: StageId) -> Option<&Stage> {
        Portal::stage(self, id)
    }

    fn segment(&self, id: SegmentId) -> Option<&Segment> {
        Portal::segment(self, id)
    }

    fn rider(&self, id: RiderId) -> Option<&Rider> {
        Portal::rider(self, id)
    }

    fn stage_results(&self, stage: StageId) -> Vec<(RiderId, &Checkpoints)> {
        self.riders
            .values()
            .filter_map(|r| r.result(stage).map(|c| (r.id(), c)))
            .collect()
    }
}

#[cfg(test)]
mod tests;
