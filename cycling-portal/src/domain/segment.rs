//! Segment types: intermediate sprints and categorised climbs.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{SegmentId, StageId};

/// The category of a segment.
///
/// `Sprint` is an intermediate sprint; the rest are climbs from the
/// hardest (`Hc`, hors catégorie) down to `C4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentType {
    #[serde(rename = "SPRINT")]
    Sprint,
    #[serde(rename = "HC")]
    Hc,
    #[serde(rename = "C1")]
    C1,
    #[serde(rename = "C2")]
    C2,
    #[serde(rename = "C3")]
    C3,
    #[serde(rename = "C4")]
    C4,
}

impl SegmentType {
    /// Returns true for categorised climbs, false for sprints.
    pub fn is_climb(self) -> bool {
        !matches!(self, SegmentType::Sprint)
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SegmentType::Sprint => "SPRINT",
            SegmentType::Hc => "HC",
            SegmentType::C1 => "C1",
            SegmentType::C2 => "C2",
            SegmentType::C3 => "C3",
            SegmentType::C4 => "C4",
        })
    }
}

/// A sprint or climb at a fixed point along a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    id: SegmentId,
    stage: StageId,
    segment_type: SegmentType,
    /// Kilometres from the stage start to the segment finish line.
    location_km: f64,
    /// Climbs only; advisory.
    average_gradient: Option<f64>,
    /// Climbs only; advisory.
    length_km: Option<f64>,
}

impl Segment {
    pub(crate) fn sprint(id: SegmentId, stage: StageId, location_km: f64) -> Self {
        Self {
            id,
            stage,
            segment_type: SegmentType::Sprint,
            location_km,
            average_gradient: None,
            length_km: None,
        }
    }

    pub(crate) fn climb(
        id: SegmentId,
        stage: StageId,
        segment_type: SegmentType,
        location_km: f64,
        average_gradient: f64,
        length_km: f64,
    ) -> Self {
        Self {
            id,
            stage,
            segment_type,
            location_km,
            average_gradient: Some(average_gradient),
            length_km: Some(length_km),
        }
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    /// The stage this segment belongs to.
    pub fn stage(&self) -> StageId {
        self.stage
    }

    pub fn segment_type(&self) -> SegmentType {
        self.segment_type
    }

    pub fn location_km(&self) -> f64 {
        self.location_km
    }

    pub fn average_gradient(&self) -> Option<f64> {
        self.average_gradient
    }

    pub fn length_km(&self) -> Option<f64> {
        self.length_km
    }
}
