//! Point tables and per-stage scoring.

use std::collections::HashMap;

use tracing::trace;

use super::rank::{rank_segment_results, rank_stage_results};
use super::{Classifier, PortalView};
use crate::domain::{Checkpoints, PortalError, RiderId, SegmentType, Stage, StageId, StageType};

/// Number of finishing places that can score.
pub const POINTS_PLACES: usize = 15;

type Table = [u32; POINTS_PLACES];

const FLAT: Table = [50, 30, 20, 18, 16, 14, 12, 10, 8, 7, 6, 5, 4, 3, 2];
const MEDIUM_MOUNTAIN: Table = [30, 25, 22, 19, 17, 15, 13, 11, 9, 7, 6, 5, 4, 3, 2];
const HIGH_MOUNTAIN: Table = [20, 17, 15, 13, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1];

const SPRINT: Table = [20, 17, 15, 13, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1];
const HC: Table = [20, 15, 12, 10, 8, 6, 4, 2, 0, 0, 0, 0, 0, 0, 0];
const C1: Table = [10, 8, 6, 4, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0];
const C2: Table = [5, 3, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
const C3: Table = [2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
const C4: Table = [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

/// Points for finishing a stage of the given type at `rank` (0 = winner).
pub fn stage_points(stage_type: StageType, rank: usize) -> u32 {
    let table = match stage_type {
        StageType::Flat => &FLAT,
        StageType::MediumMountain => &MEDIUM_MOUNTAIN,
        StageType::HighMountain | StageType::TimeTrial => &HIGH_MOUNTAIN,
    };
    table.get(rank).copied().unwrap_or(0)
}

/// Points for crossing a segment of the given type at `rank` (0 = first).
pub fn segment_points(segment_type: SegmentType, rank: usize) -> u32 {
    let table = match segment_type {
        SegmentType::Sprint => &SPRINT,
        SegmentType::Hc => &HC,
        SegmentType::C1 => &C1,
        SegmentType::C2 => &C2,
        SegmentType::C3 => &C3,
        SegmentType::C4 => &C4,
    };
    table.get(rank).copied().unwrap_or(0)
}

/// Which classification a stage's points feed.
///
/// Intermediate sprints only ever count towards the points classification,
/// and the stage finish only towards points; climbs only towards mountain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PointsClass {
    Points,
    Mountain,
}

impl PointsClass {
    fn includes(self, segment_type: SegmentType) -> bool {
        match self {
            PointsClass::Points => !segment_type.is_climb(),
            PointsClass::Mountain => segment_type.is_climb(),
        }
    }
}

impl<V: PortalView> Classifier<'_, V> {
    /// Points each rider earned in a stage from the finish and intermediate
    /// sprints, aligned with [`Classifier::rank_stage`].
    ///
    /// # Errors
    ///
    /// Returns an unknown-entity error if the stage, or one of its segments,
    /// does not exist.
    pub fn stage_points(&self, stage_id: StageId) -> Result<Vec<u32>, PortalError> {
        self.class_points(stage_id, PointsClass::Points)
    }

    /// Mountain points each rider earned on a stage's categorised climbs,
    /// aligned with [`Classifier::rank_stage`].
    ///
    /// # Errors
    ///
    /// Returns an unknown-entity error if the stage, or one of its segments,
    /// does not exist.
    pub fn mountain_points(&self, stage_id: StageId) -> Result<Vec<u32>, PortalError> {
        self.class_points(stage_id, PointsClass::Mountain)
    }

    fn class_points(&self, stage_id: StageId, class: PointsClass) -> Result<Vec<u32>, PortalError> {
        let stage = self.require_stage(stage_id)?;
        let results = self.view.stage_results(stage_id);
        let ranking = rank_stage_results(&results);
        self.points_for(stage, &results, &ranking, class)
    }

    /// Score one classification for a stage, aligned with `ranking`.
    pub(super) fn points_for(
        &self,
        stage: &Stage,
        results: &[(RiderId, &Checkpoints)],
        ranking: &[RiderId],
        class: PointsClass,
    ) -> Result<Vec<u32>, PortalError> {
        let mut totals: HashMap<RiderId, u32> = HashMap::new();

        if class == PointsClass::Points {
            for (rank, rider) in ranking.iter().enumerate() {
                *totals.entry(*rider).or_default() += stage_points(stage.stage_type(), rank);
            }
        }

        for (index, segment_id) in stage.segments().iter().enumerate() {
            let segment = self.require_segment(*segment_id)?;
            if !class.includes(segment.segment_type()) {
                continue;
            }
            let segment_ranking = rank_segment_results(results, index);
            for (rank, rider) in segment_ranking.iter().enumerate() {
                *totals.entry(*rider).or_default() += segment_points(segment.segment_type(), rank);
            }
        }

        trace!(stage = %stage.id(), ?class, riders = ranking.len(), "scored stage");

        Ok(ranking
            .iter()
            .map(|id| totals.get(id).copied().unwrap_or(0))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_tables() {
        assert_eq!(stage_points(StageType::Flat, 0), 50);
        assert_eq!(stage_points(StageType::Flat, 14), 2);
        assert_eq!(stage_points(StageType::MediumMountain, 1), 25);
        assert_eq!(stage_points(StageType::HighMountain, 2), 15);
        assert_eq!(stage_points(StageType::TimeTrial, 0), 20);
        assert_eq!(stage_points(StageType::TimeTrial, 14), 1);
    }

    #[test]
    fn segment_tables() {
        assert_eq!(segment_points(SegmentType::Sprint, 0), 20);
        assert_eq!(segment_points(SegmentType::Hc, 7), 2);
        assert_eq!(segment_points(SegmentType::Hc, 8), 0);
        assert_eq!(segment_points(SegmentType::C1, 5), 1);
        assert_eq!(segment_points(SegmentType::C2, 3), 1);
        assert_eq!(segment_points(SegmentType::C3, 1), 1);
        assert_eq!(segment_points(SegmentType::C4, 0), 1);
        assert_eq!(segment_points(SegmentType::C4, 1), 0);
    }

    #[test]
    fn high_mountain_and_time_trial_share_a_table() {
        for rank in 0..POINTS_PLACES {
            assert_eq!(
                stage_points(StageType::HighMountain, rank),
                stage_points(StageType::TimeTrial, rank)
            );
        }
    }

    #[test]
    fn tables_are_non_increasing() {
        for table in [&FLAT, &MEDIUM_MOUNTAIN, &HIGH_MOUNTAIN, &SPRINT, &HC, &C1, &C2, &C3, &C4] {
            assert!(table.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn sprints_only_count_for_points() {
        assert!(PointsClass::Points.includes(SegmentType::Sprint));
        assert!(!PointsClass::Mountain.includes(SegmentType::Sprint));
        for climb in [SegmentType::Hc, SegmentType::C1, SegmentType::C2, SegmentType::C3, SegmentType::C4] {
            assert!(PointsClass::Mountain.includes(climb));
            assert!(!PointsClass::Points.includes(climb));
        }
    }
}
