//! Race-level aggregation.
//!
//! Every stage of a race is summarised (ranking, adjusted times, points)
//! and the per-rider sums form the general, points and mountain
//! classifications. Only riders with a result in at least one stage of the
//! race appear.

use std::collections::BTreeMap;

use chrono::Duration;
use tracing::debug;

use super::points::PointsClass;
use super::rank::rank_stage_results;
use super::{Classifier, PortalView};
use crate::domain::{PortalError, RaceId, RiderId, StageId};

/// Everything computed for one stage, aligned to the stage ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSummary {
    /// Riders with a result, fastest first.
    pub riders: Vec<RiderId>,
    pub adjusted: Vec<Duration>,
    pub points: Vec<u32>,
    pub mountain_points: Vec<u32>,
}

impl StageSummary {
    pub fn len(&self) -> usize {
        self.riders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.riders.is_empty()
    }
}

/// Race totals, aligned to general classification order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaceStandings {
    /// Riders by total adjusted time, least first. Equal totals are
    /// ordered by rider id.
    pub riders: Vec<RiderId>,
    pub times: Vec<Duration>,
    pub points: Vec<u32>,
    pub mountain_points: Vec<u32>,
}

impl RaceStandings {
    pub fn len(&self) -> usize {
        self.riders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.riders.is_empty()
    }

    /// General classification order stably re-sorted by points, most first.
    pub fn points_order(&self) -> Vec<RiderId> {
        sort_desc_stable(&self.riders, &self.points)
    }

    /// General classification order stably re-sorted by mountain points,
    /// most first.
    pub fn mountain_order(&self) -> Vec<RiderId> {
        sort_desc_stable(&self.riders, &self.mountain_points)
    }
}

fn sort_desc_stable(riders: &[RiderId], scores: &[u32]) -> Vec<RiderId> {
    let mut paired: Vec<(RiderId, u32)> = riders.iter().copied().zip(scores.iter().copied()).collect();
    paired.sort_by(|a, b| b.1.cmp(&a.1));
    paired.into_iter().map(|(id, _)| id).collect()
}

struct Totals {
    time: Duration,
    points: u32,
    mountain_points: u32,
}

impl Default for Totals {
    fn default() -> Self {
        Self {
            time: Duration::zero(),
            points: 0,
            mountain_points: 0,
        }
    }
}

impl<V: PortalView> Classifier<'_, V> {
    /// Ranking, adjusted times and both kinds of points for one stage.
    ///
    /// # Errors
    ///
    /// Returns an unknown-entity error if the stage, or one of its segments,
    /// does not exist.
    pub fn stage_summary(&self, stage_id: StageId) -> Result<StageSummary, PortalError> {
        let stage = self.require_stage(stage_id)?;
        let results = self.view.stage_results(stage_id);
        let riders = rank_stage_results(&results);

        let adjusted_by_rider = self.stage_adjusted_times(stage, &results);
        let adjusted = riders
            .iter()
            .map(|id| adjusted_by_rider.get(id).copied().unwrap_or_else(Duration::zero))
            .collect();
        let points = self.points_for(stage, &results, &riders, PointsClass::Points)?;
        let mountain_points = self.points_for(stage, &results, &riders, PointsClass::Mountain)?;

        Ok(StageSummary {
            riders,
            adjusted,
            points,
            mountain_points,
        })
    }

    /// Totals across every stage of a race.
    ///
    /// # Errors
    ///
    /// Returns an unknown-entity error if the race, or any stage or segment
    /// it refers to, does not exist. No partial standings are returned.
    pub fn race_standings(&self, race_id: RaceId) -> Result<RaceStandings, PortalError> {
        let race = self.require_race(race_id)?;

        let mut totals: BTreeMap<RiderId, Totals> = BTreeMap::new();
        for stage_id in race.stages() {
            let summary = self.stage_summary(*stage_id)?;
            for (i, rider) in summary.riders.iter().enumerate() {
                let entry = totals.entry(*rider).or_default();
                entry.time += summary.adjusted[i];
                entry.points += summary.points[i];
                entry.mountain_points += summary.mountain_points[i];
            }
        }

        // BTreeMap iterates in rider id order, so the stable sort leaves
        // equal times ordered by id.
        let mut ordered: Vec<(RiderId, Totals)> = totals.into_iter().collect();
        ordered.sort_by_key(|(_, t)| t.time);

        debug!(race = %race_id, riders = ordered.len(), "computed race standings");

        let mut standings = RaceStandings::default();
        for (rider, t) in ordered {
            standings.riders.push(rider);
            standings.times.push(t.time);
            standings.points.push(t.points);
            standings.mountain_points.push(t.mountain_points);
        }
        Ok(standings)
    }

    /// Riders by total adjusted time across the race, least first.
    ///
    /// # Errors
    ///
    /// See [`Classifier::race_standings`].
    pub fn general_classification(&self, race_id: RaceId) -> Result<Vec<RiderId>, PortalError> {
        Ok(self.race_standings(race_id)?.riders)
    }

    /// Total adjusted times, aligned with
    /// [`Classifier::general_classification`].
    ///
    /// # Errors
    ///
    /// See [`Classifier::race_standings`].
    pub fn general_classification_times(&self, race_id: RaceId) -> Result<Vec<Duration>, PortalError> {
        Ok(self.race_standings(race_id)?.times)
    }

    /// Total points, aligned with [`Classifier::general_classification`].
    ///
    /// # Errors
    ///
    /// See [`Classifier::race_standings`].
    pub fn points_in_race(&self, race_id: RaceId) -> Result<Vec<u32>, PortalError> {
        Ok(self.race_standings(race_id)?.points)
    }

    /// Total mountain points, aligned with
    /// [`Classifier::general_classification`].
    ///
    /// # Errors
    ///
    /// See [`Classifier::race_standings`].
    pub fn mountain_points_in_race(&self, race_id: RaceId) -> Result<Vec<u32>, PortalError> {
        Ok(self.race_standings(race_id)?.mountain_points)
    }

    /// Riders by total points, most first. Ties keep general
    /// classification order.
    ///
    /// # Errors
    ///
    /// See [`Classifier::race_standings`].
    pub fn points_classification(&self, race_id: RaceId) -> Result<Vec<RiderId>, PortalError> {
        Ok(self.race_standings(race_id)?.points_order())
    }

    /// Riders by total mountain points, most first. Ties keep general
    /// classification order.
    ///
    /// # Errors
    ///
    /// See [`Classifier::race_standings`].
    pub fn mountain_classification(&self, race_id: RaceId) -> Result<Vec<RiderId>, PortalError> {
        Ok(self.race_standings(race_id)?.mountain_order())
    }
}
