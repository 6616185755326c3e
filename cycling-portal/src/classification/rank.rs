//! Stage and segment rankings.
//!
//! Riders are ranked by raw elapsed time, not adjusted time, so that
//! arrival order is preserved inside a bunch that shares a time.
//! Times are compared at microsecond precision. Equal times are broken by
//! rider id, lowest first, which keeps rankings reproducible regardless of
//! the order results were registered in.

use chrono::Duration;
use tracing::trace;

use super::{Classifier, PortalView};
use crate::domain::{Checkpoints, PortalError, RiderId, StageId};

impl<V: PortalView> Classifier<'_, V> {
    /// Riders with a result in the stage, fastest first.
    ///
    /// Empty if nobody has a result yet.
    ///
    /// # Errors
    ///
    /// Returns an unknown-entity error if the stage does not exist.
    pub fn rank_stage(&self, stage_id: StageId) -> Result<Vec<RiderId>, PortalError> {
        self.require_stage(stage_id)?;
        let results = self.view.stage_results(stage_id);
        Ok(rank_stage_results(&results))
    }

    /// Adjusted elapsed times aligned with [`Classifier::rank_stage`].
    ///
    /// A bunch sharing a time keeps its arrival order, so equal times can
    /// appear next to each other in any rider id order.
    ///
    /// # Errors
    ///
    /// Returns an unknown-entity error if the stage does not exist.
    pub fn ranked_adjusted_elapsed_times(&self, stage_id: StageId) -> Result<Vec<Duration>, PortalError> {
        let stage = self.require_stage(stage_id)?;
        let results = self.view.stage_results(stage_id);
        let adjusted = self.stage_adjusted_times(stage, &results);

        Ok(rank_stage_results(&results)
            .iter()
            .filter_map(|id| adjusted.get(id).copied())
            .collect())
    }
}

/// Rank stage results by raw elapsed time.
pub(super) fn rank_stage_results(results: &[(RiderId, &Checkpoints)]) -> Vec<RiderId> {
    rank_by(results, |c| Some(c.elapsed()))
}

/// Rank riders on segment `index`, timed between checkpoints `index` and
/// `index + 1`. Riders missing either checkpoint are left out.
pub(super) fn rank_segment_results(
    results: &[(RiderId, &Checkpoints)],
    index: usize,
) -> Vec<RiderId> {
    rank_by(results, |c| c.segment_elapsed(index))
}

fn rank_by<F>(results: &[(RiderId, &Checkpoints)], key: F) -> Vec<RiderId>
where
    F: Fn(&Checkpoints) -> Option<Duration>,
{
    let mut keyed: Vec<(i64, RiderId)> = results
        .iter()
        .filter_map(|(id, c)| key(c).map(|d| (micros(d), *id)))
        .collect();

    // Primary: time. Secondary: rider id.
    keyed.sort_unstable();
    trace!(riders = keyed.len(), "ranked riders");

    keyed.into_iter().map(|(_, id)| id).collect()
}

/// Duration in whole microseconds, saturating for out-of-range values.
fn micros(d: Duration) -> i64 {
    d.num_microseconds()
        .unwrap_or(if d < Duration::zero() { i64::MIN } else { i64::MAX })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::NaiveTime;
    use proptest::prelude::*;

    fn results_strategy() -> impl Strategy<Value = Vec<Checkpoints>> {
        // Small range of finish offsets so ties happen
        prop::collection::vec(0i64..50, 0..30).prop_map(|finishes| {
            let base = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
            finishes
                .into_iter()
                .map(|s| Checkpoints::new(vec![base, base + Duration::seconds(s)]).unwrap())
                .collect()
        })
    }

    proptest! {
        /// Output is sorted by (elapsed, rider id) and keeps every rider
        #[test]
        fn sorted_by_time_then_id(checkpoints in results_strategy()) {
            let results: Vec<(RiderId, &Checkpoints)> = checkpoints
                .iter()
                .enumerate()
                .map(|(i, c)| (RiderId(i as u32 + 1), c))
                .collect();

            let ranked = rank_stage_results(&results);
            prop_assert_eq!(ranked.len(), results.len());

            let elapsed = |id: RiderId| checkpoints[(id.get() - 1) as usize].elapsed();
            for w in ranked.windows(2) {
                prop_assert!((elapsed(w[0]), w[0]) < (elapsed(w[1]), w[1]));
            }
        }

        /// Registration order does not affect the ranking
        #[test]
        fn independent_of_input_order(
            (checkpoints, order) in results_strategy().prop_flat_map(|c| {
                let idx: Vec<usize> = (0..c.len()).collect();
                (Just(c), Just(idx).prop_shuffle())
            })
        ) {
            let in_order: Vec<(RiderId, &Checkpoints)> = checkpoints
                .iter()
                .enumerate()
                .map(|(i, c)| (RiderId(i as u32 + 1), c))
                .collect();
            let shuffled: Vec<(RiderId, &Checkpoints)> =
                order.iter().map(|&i| in_order[i]).collect();

            prop_assert_eq!(rank_stage_results(&in_order), rank_stage_results(&shuffled));
        }
    }
}
