//! Chain data: segments, joints and the optional pendant.

use nalgebra::Point2;
use sim_planar_types::{BodyId, JointDef, JointId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ChainId;

/// One rigid link of a chain.
///
/// A segment spans two consecutive curve samples. Its body is rotated so
/// that the *forward* anchor, `sign · half_length · gap_ratio` along the
/// local x axis, sits on the later sample and the *backward* anchor on the
/// earlier one.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChainSegment {
    /// Position in the chain, in sample order.
    pub index: usize,
    /// Rigid body of the segment.
    pub body: BodyId,
    /// Half the distance between the two samples.
    pub half_length: f64,
    /// Thickness of the body.
    pub thickness: f64,
    /// Orientation flag, `+1` or `-1`.
    pub sign: f64,
    /// Gap ratio the chain was built with.
    pub gap_ratio: f64,
}

impl ChainSegment {
    /// Local anchor joined to the next segment.
    #[must_use]
    pub fn forward_anchor(&self) -> Point2<f64> {
        Point2::new(self.sign * self.half_length * self.gap_ratio, 0.0)
    }

    /// Local anchor joined to the previous segment.
    #[must_use]
    pub fn backward_anchor(&self) -> Point2<f64> {
        Point2::new(-self.sign * self.half_length * self.gap_ratio, 0.0)
    }
}

/// What a joint of a chain connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointRole {
    /// Segment `from`'s forward anchor to segment `from + 1`'s backward anchor.
    Link {
        /// Index of the earlier segment.
        from: usize,
    },
    /// Last segment's forward anchor to the first segment's backward anchor.
    Closure,
    /// Pendant pinned to the first segment's backward anchor.
    PendantHead,
    /// Pendant pinned to the last segment's forward anchor.
    PendantTail,
}

/// A joint created for a chain.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointConstraint {
    /// Handle in the physics world.
    pub id: JointId,
    /// Position of the joint in the chain.
    pub role: JointRole,
    /// Bodies, anchors and kind the joint was created with.
    pub def: JointDef,
}

/// An ordered sequence of linked segments.
///
/// Topology is fixed once the chain is built; only the bodies' poses change
/// under simulation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chain {
    id: ChainId,
    segments: Vec<ChainSegment>,
    joints: Vec<JointConstraint>,
    closed: bool,
    group: Option<u64>,
    pendant: Option<BodyId>,
    pendant_group: Option<u64>,
    source_gap: f64,
    offset: f64,
}

impl Chain {
    pub(crate) fn new(id: ChainId, segments: Vec<ChainSegment>, source_gap: f64, offset: f64) -> Self {
        Self {
            id,
            segments,
            joints: Vec::new(),
            closed: false,
            group: None,
            pendant: None,
            pendant_group: None,
            source_gap,
            offset,
        }
    }

    /// Chain identifier.
    #[must_use]
    pub fn id(&self) -> ChainId {
        self.id
    }

    /// Segments in sample order.
    #[must_use]
    pub fn segments(&self) -> &[ChainSegment] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the chain has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Joints, links first, then closure, then pendant pins.
    #[must_use]
    pub fn joints(&self) -> &[JointConstraint] {
        &self.joints
    }

    /// Whether the last segment is joined back to the first.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Collision group shared by the chain's bodies, if grouped.
    #[must_use]
    pub fn collision_group(&self) -> Option<u64> {
        self.group
    }

    /// The pendant body, if one rides the chain.
    #[must_use]
    pub fn pendant(&self) -> Option<BodyId> {
        self.pendant
    }

    /// Group the pendant was in before the chain grouped it.
    #[must_use]
    pub fn pendant_previous_group(&self) -> Option<u64> {
        self.pendant_group
    }

    /// Distance between the endpoints of the curve the chain was built from.
    #[must_use]
    pub fn source_gap(&self) -> f64 {
        self.source_gap
    }

    /// Offset of the closing knot used for reconstruction.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Segment bodies in chain order.
    pub fn bodies(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.segments.iter().map(|s| s.body)
    }

    /// Whether `body` is one of the chain's segments or its pendant.
    #[must_use]
    pub fn owns_body(&self, body: BodyId) -> bool {
        self.pendant == Some(body) || self.segments.iter().any(|s| s.body == body)
    }

    pub(crate) fn attach_joints(&mut self, joints: Vec<JointConstraint>, closed: bool, pendant: Option<BodyId>) {
        self.joints = joints;
        self.closed = closed;
        self.pendant = pendant;
    }

    pub(crate) fn set_group(&mut self, group: u64, pendant_group: Option<u64>) {
        self.group = Some(group);
        self.pendant_group = pendant_group;
    }
}
