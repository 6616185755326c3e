//! Stage types.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{EntityName, RaceId, SegmentId, StageId};

/// Shortest stage the portal accepts, in kilometres.
pub const MIN_STAGE_LENGTH_KM: f64 = 5.0;

/// The terrain profile of a stage, which selects its finish points table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageType {
    #[serde(rename = "FLAT")]
    Flat,
    #[serde(rename = "MEDIUM_MOUNTAIN")]
    MediumMountain,
    #[serde(rename = "HIGH_MOUNTAIN")]
    HighMountain,
    /// Individual time trial. Riders start separately, so finish times are
    /// never grouped, and no segments may be added.
    #[serde(rename = "TT")]
    TimeTrial,
}

impl StageType {
    /// Returns true for time trials.
    pub fn is_time_trial(self) -> bool {
        matches!(self, StageType::TimeTrial)
    }
}

impl fmt::Display for StageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StageType::Flat => "FLAT",
            StageType::MediumMountain => "MEDIUM_MOUNTAIN",
            StageType::HighMountain => "HIGH_MOUNTAIN",
            StageType::TimeTrial => "TT",
        })
    }
}

/// Where a stage is in its lifecycle.
///
/// Stages start in `Setup`, where segments can be changed. Concluding
/// preparation moves them to `WaitingForResults`, after which segments are
/// frozen and results can be registered. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StageState {
    #[default]
    #[serde(rename = "SETUP")]
    Setup,
    #[serde(rename = "WAITING_FOR_RESULTS")]
    WaitingForResults,
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StageState::Setup => "SETUP",
            StageState::WaitingForResults => "WAITING_FOR_RESULTS",
        })
    }
}

/// One day of racing within a race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    id: StageId,
    race: RaceId,
    name: EntityName,
    description: String,
    length_km: f64,
    stage_type: StageType,
    start: NaiveDateTime,
    /// Ordered by location along the stage.
    segments: Vec<SegmentId>,
    state: StageState,
}

impl Stage {
    pub(crate) fn new(
        id: StageId,
        race: RaceId,
        name: EntityName,
        description: String,
        length_km: f64,
        stage_type: StageType,
        start: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            race,
            name,
            description,
            length_km,
            stage_type,
            start,
            segments: Vec::new(),
            state: StageState::Setup,
        }
    }

    pub fn id(&self) -> StageId {
        self.id
    }

    /// The race this stage belongs to.
    pub fn race(&self) -> RaceId {
        self.race
    }

    pub fn name(&self) -> &EntityName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn length_km(&self) -> f64 {
        self.length_km
    }

    pub fn stage_type(&self) -> StageType {
        self.stage_type
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Segment ids in order of location.
    pub fn segments(&self) -> &[SegmentId] {
        &self.segments
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    /// Number of checkpoints every result in this stage must carry.
    pub fn expected_checkpoints(&self) -> usize {
        self.segments.len() + 2
    }

    pub(crate) fn insert_segment(&mut self, position: usize, segment: SegmentId) {
        self.segments.insert(position, segment);
    }

    pub(crate) fn remove_segment(&mut self, segment: SegmentId) {
        self.segments.retain(|s| *s != segment);
    }

    pub(crate) fn set_state(&mut self, state: StageState) {
        self.state = state;
    }
}
