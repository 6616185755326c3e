//! Adjusted elapsed times.
//!
//! In mass-start stages, riders crossing the line in a bunch are all given
//! the time of the first rider in that bunch. A rider finishing less than
//! the same-time gap (one second by default) behind another takes that
//! rider's finish time; since the adjusted time may now be within the gap
//! of yet another rider, the rule is applied again until nothing changes.
//! A long chain of close finishers therefore collapses to the time of the
//! first rider in the chain.
//!
//! Time trials are never adjusted.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::trace;

use super::{Classifier, PortalView};
use crate::domain::{Checkpoints, PortalError, RiderId, Stage, StageId};

/// Apply the same-time rule to one finish time.
///
/// Repeatedly scans `others`; any finish strictly earlier than the current
/// one by less than `same_time_gap` replaces it. Passes repeat until one
/// makes no replacement. The result is the earliest finish reachable
/// through a chain of sub-gap differences, whatever order `others` is in.
///
/// `others` may contain `finish` itself.
pub fn collapse_finish(
    finish: NaiveDateTime,
    others: &[NaiveDateTime],
    same_time_gap: Duration,
) -> NaiveDateTime {
    let mut finish = finish;
    let mut passes = 0usize;

    loop {
        passes += 1;
        let mut adjusted = false;
        for &other in others {
            let gap = finish.signed_duration_since(other);
            if gap > Duration::zero() && gap < same_time_gap {
                finish = other;
                adjusted = true;
            }
        }
        if !adjusted {
            break;
        }
    }

    trace!(passes, %finish, "collapsed finish time");
    finish
}

impl<V: PortalView> Classifier<'_, V> {
    /// A rider's adjusted elapsed time in a stage.
    ///
    /// Returns `Ok(None)` if the rider has no result in the stage.
    ///
    /// # Errors
    ///
    /// Returns an unknown-entity error if the stage or rider does not exist.
    pub fn adjusted_elapsed_time(
        &self,
        stage_id: StageId,
        rider_id: RiderId,
    ) -> Result<Option<Duration>, PortalError> {
        let stage = self.require_stage(stage_id)?;
        self.require_rider(rider_id)?;

        let results = self.view.stage_results(stage_id);
        let Some(own) = results
            .iter()
            .find(|(id, _)| *id == rider_id)
            .map(|(_, c)| *c)
        else {
            return Ok(None);
        };

        let finishes = finish_times(stage, &results);
        Ok(Some(self.adjust(stage, own, &finishes)))
    }

    /// Adjusted elapsed times for every rider with a result in `stage`.
    pub(super) fn stage_adjusted_times(
        &self,
        stage: &Stage,
        results: &[(RiderId, &Checkpoints)],
    ) -> HashMap<RiderId, Duration> {
        let finishes = finish_times(stage, results);
        results
            .iter()
            .map(|(id, c)| (*id, self.adjust(stage, c, &finishes)))
            .collect()
    }

    /// Adjusted time is always measured from the rider's own start, even
    /// when the finish was borrowed from another rider. Mass-start riders
    /// share a start time, so the two agree.
    fn adjust(&self, stage: &Stage, own: &Checkpoints, finishes: &[NaiveDateTime]) -> Duration {
        if stage.stage_type().is_time_trial() {
            return own.elapsed();
        }
        let day = start_day(stage);
        let finish = collapse_finish(own.finish_on(day), finishes, self.config.same_time_gap());
        finish.signed_duration_since(own.start_on(day))
    }
}

/// Every result is dated from the stage's start day, so finishes either
/// side of midnight still compare correctly.
fn start_day(stage: &Stage) -> NaiveDate {
    stage.start().date()
}

fn finish_times(stage: &Stage, results: &[(RiderId, &Checkpoints)]) -> Vec<NaiveDateTime> {
    let day = start_day(stage);
    results.iter().map(|(_, c)| c.finish_on(day)).collect()
}
