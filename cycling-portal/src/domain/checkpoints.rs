//! Checkpoint timings for a rider in one stage.
//!
//! A result is the ordered list of times a rider crossed each timing point:
//! the start, one crossing per segment in stage order, then the finish.
//! Times are wall-clock times of day, matching how organisers record them.
//! A stage lasts less than a day, so a time earlier in the day than the
//! start belongs to the following day.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Error returned when a checkpoint list cannot form a result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid checkpoints: need at least a start and a finish, got {count}")]
pub struct InvalidCheckpoints {
    count: usize,
}

/// A rider's checkpoint times in a stage.
///
/// Holds at least two times (start and finish). The order of intermediate
/// crossings is not checked: timing mats are allowed to disagree with each
/// other, and ranking only ever looks at differences.
///
/// # Examples
///
/// ```
/// use cycling_portal::domain::Checkpoints;
/// use chrono::{Duration, NaiveTime};
///
/// let start = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
/// let sprint = NaiveTime::from_hms_opt(10, 20, 0).unwrap();
/// let finish = NaiveTime::from_hms_opt(10, 45, 0).unwrap();
///
/// let result = Checkpoints::new(vec![start, sprint, finish]).unwrap();
/// assert_eq!(result.elapsed(), Duration::minutes(45));
/// assert_eq!(result.segment_elapsed(0), Some(Duration::minutes(20)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NaiveTime>", into = "Vec<NaiveTime>")]
pub struct Checkpoints(Vec<NaiveTime>);

impl Checkpoints {
    /// Wrap a checkpoint list, requiring a start and a finish.
    pub fn new(times: Vec<NaiveTime>) -> Result<Self, InvalidCheckpoints> {
        if times.len() < 2 {
            return Err(InvalidCheckpoints { count: times.len() });
        }
        Ok(Self(times))
    }

    /// The start time.
    pub fn start(&self) -> NaiveTime {
        self.0[0]
    }

    /// The finish time.
    pub fn finish(&self) -> NaiveTime {
        self.0[self.0.len() - 1]
    }

    /// Number of checkpoints, including start and finish.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a result has at least two checkpoints.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All checkpoint times in order.
    pub fn as_slice(&self) -> &[NaiveTime] {
        &self.0
    }

    /// Raw elapsed time, finish minus start.
    pub fn elapsed(&self) -> Duration {
        self.since_start(self.finish())
    }

    /// The start as a date and time, taking `date` as the start day.
    pub fn start_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.start())
    }

    /// The finish as a date and time, taking `date` as the start day. Rolls
    /// over to the next day when the stage ran past midnight.
    pub fn finish_on(&self, date: NaiveDate) -> NaiveDateTime {
        self.start_on(date) + self.elapsed()
    }

    /// Time from the start to `time`, which is on the start day unless it is
    /// earlier in the day than the start.
    fn since_start(&self, time: NaiveTime) -> Duration {
        let delta = time.signed_duration_since(self.start());
        if delta < Duration::zero() {
            delta + Duration::days(1)
        } else {
            delta
        }
    }

    /// Time between the two checkpoints bounding segment `index`.
    ///
    /// Segment `i` is timed from checkpoint `i` to checkpoint `i + 1`.
    /// Returns `None` when the result has no such checkpoints.
    pub fn segment_elapsed(&self, index: usize) -> Option<Duration> {
        let from = self.0.get(index)?;
        let to = self.0.get(index + 1)?;
        Some(self.since_start(*to) - self.since_start(*from))
    }
}

impl TryFrom<Vec<NaiveTime>> for Checkpoints {
    type Error = InvalidCheckpoints;

    fn try_from(times: Vec<NaiveTime>) -> Result<Self, Self::Error> {
        Self::new(times)
    }
}

impl From<Checkpoints> for Vec<NaiveTime> {
    fn from(checkpoints: Checkpoints) -> Self {
        checkpoints.0
    }
}
