//! Classification and scoring.
//!
//! Turns riders' raw checkpoint times into adjusted stage times, stage
//! rankings, stage and segment points, and the three race classifications
//! (general, points, mountain).
//!
//! Everything here is a pure read over a [`PortalView`]. Each stage of the
//! pipeline only depends on entity data and the stages before it:
//!
//! 1. time adjustment ([`Classifier::adjusted_elapsed_time`])
//! 2. stage ranking ([`Classifier::rank_stage`])
//! 3. scoring ([`Classifier::stage_points`], [`Classifier::mountain_points`])
//! 4. race aggregation ([`Classifier::race_standings`])

mod adjust;
mod config;
mod points;
mod race;
mod rank;
mod view;


pub use adjust::collapse_finish;
pub use config::ClassificationConfig;
pub use points::{POINTS_PLACES, segment_points, stage_points};
pub use race::{RaceStandings, StageSummary};
pub use view::PortalView;

use crate::domain::{EntityKind, PortalError, Race, RaceId, Rider, RiderId, Segment, SegmentId, Stage, StageId};

/// Computes classifications over a borrowed store.
///
/// Holding a shared borrow for the classifier's lifetime means the data
/// cannot change under a query.
#[derive(Debug, Clone)]
pub struct Classifier<'a, V: PortalView> {
    view: &'a V,
    config: ClassificationConfig,
}

impl<'a, V: PortalView> Classifier<'a, V> {
    /// Create a classifier with the default configuration.
    pub fn new(view: &'a V) -> Self {
        Self::with_config(view, ClassificationConfig::default())
    }

    pub fn with_config(view: &'a V, config: ClassificationConfig) -> Self {
        Self { view, config }
    }

    pub fn config(&self) -> &ClassificationConfig {
        &self.config
    }

    fn require_race(&self, id: RaceId) -> Result<&'a Race, PortalError> {
        self.view
            .race(id)
            .ok_or_else(|| PortalError::unknown_id(EntityKind::Race, id.get()))
    }

    fn require_stage(&self, id: StageId) -> Result<&'a Stage, PortalError> {
        self.view
            .stage(id)
            .ok_or_else(|| PortalError::unknown_id(EntityKind::Stage, id.get()))
    }

    fn require_segment(&self, id: SegmentId) -> Result<&'a Segment, PortalError> {
        self.view
            .segment(id)
            .ok_or_else(|| PortalError::unknown_id(EntityKind::Segment, id.get()))
    }

    fn require_rider(&self, id: RiderId) -> Result<&'a Rider, PortalError> {
        self.view
            .rider(id)
            .ok_or_else(|| PortalError::unknown_id(EntityKind::Rider, id.get()))
    }
}
