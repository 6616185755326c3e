//! Read access the classifier needs from a store.

use crate::domain::{Checkpoints, Race, RaceId, Rider, RiderId, Segment, SegmentId, Stage, StageId};

/// Trait for providing entity data to the classifier.
///
/// Lookups return `None` for unknown ids; the classifier turns that into
/// an unknown-entity error. This abstraction allows classification to be
/// tested against hand-built data.
pub trait PortalView {
    fn race(&self, id: RaceId) -> Option<&Race>;

    fn stage(&self, id: StageId) -> Option<&Stage>;

    fn segment(&self, id: SegmentId) -> Option<&Segment>;

    fn rider(&self, id: RiderId) -> Option<&Rider>;

    /// Every rider's result in `stage`, ordered by rider id.
    fn stage_results(&self, stage: StageId) -> Vec<(RiderId, &Checkpoints)>;
}
