//! Wiring segments into a chain.

use loop_curves::LOOP_TOLERANCE;
use nalgebra::Point2;
use sim_planar_types::{BodyId, JointDef};
use tracing::{debug, info};

use crate::{Chain, JointConstraint, JointRole, PhysicsBackend, Result, RopeError};

/// Creates the joints of a built chain.
///
/// Adjacent segments are joined forward anchor to backward anchor. A closed
/// chain gets one more joint from the last segment to the first, and an
/// optional pendant is pinned to both ends of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JointLinker {
    close_loop: bool,
    pendant: Option<BodyId>,
}

impl JointLinker {
    /// Create a linker.
    #[must_use]
    pub fn new(close_loop: bool) -> Self {
        Self {
            close_loop,
            pendant: None,
        }
    }

    /// Pin `body` to the ends of the loop.
    #[must_use]
    pub fn with_pendant(mut self, body: BodyId) -> Self {
        self.pendant = Some(body);
        self
    }

    /// Link `chain` in `backend`.
    ///
    /// All checks run before the first joint is created. If the backend
    /// rejects a joint midway, every joint created so far is removed and a
    /// moved pendant goes back to where it was.
    ///
    /// # Errors
    ///
    /// - [`RopeError::OpenCurveLoop`] if closure is requested for a curve
    ///   whose endpoints are further apart than [`LOOP_TOLERANCE`]
    /// - [`RopeError::PendantRequiresLoop`] for a pendant on an open chain
    /// - [`RopeError::MissingBody`] if the pendant is not in `backend`
    /// - [`RopeError::InvalidConfig`] if the chain is already linked, too
    ///   short to close, or the pendant is one of its segments
    pub fn link<B>(&self, backend: &mut B, chain: &mut Chain) -> Result<()>
    where
        B: PhysicsBackend + ?Sized,
    {
        self.check(backend, chain)?;

        let restore = match self.pendant {
            Some(body) => backend.pose(body).map(|pose| (body, pose.position)),
            None => None,
        };

        let mut created = Vec::new();
        if let Err(err) = self.create_joints(backend, chain, &mut created) {
            for joint in &created {
                backend.remove_joint(joint.id);
            }
            if let Some((body, position)) = restore {
                backend.set_position(body, position)?;
            }
            debug!(chain = chain.id().raw(), %err, "linking failed, rolled back");
            return Err(err);
        }

        info!(
            chain = chain.id().raw(),
            joints = created.len(),
            closed = self.close_loop,
            pendant = self.pendant.is_some(),
            "linked chain"
        );
        chain.attach_joints(created, self.close_loop, self.pendant);
        Ok(())
    }

    fn check<B>(&self, backend: &B, chain: &Chain) -> Result<()>
    where
        B: PhysicsBackend + ?Sized,
    {
        if !chain.joints().is_empty() {
            return Err(RopeError::invalid_config(format!("{} is already linked", chain.id())));
        }
        if chain.is_empty() {
            return Err(RopeError::invalid_config("cannot link an empty chain"));
        }
        if self.close_loop {
            if chain.source_gap() >= LOOP_TOLERANCE || !chain.source_gap().is_finite() {
                return Err(RopeError::OpenCurveLoop {
                    gap: chain.source_gap(),
                });
            }
            if chain.len() < 3 {
                return Err(RopeError::invalid_config(format!(
                    "closing a loop needs at least 3 segments, got {}",
                    chain.len()
                )));
            }
        }
        if let Some(body) = self.pendant {
            if !self.close_loop {
                return Err(RopeError::PendantRequiresLoop);
            }
            if !backend.contains_body(body) {
                return Err(RopeError::missing_body(body));
            }
            if chain.owns_body(body) {
                return Err(RopeError::invalid_config(format!(
                    "{body} is a segment of {}",
                    chain.id()
                )));
            }
        }
        Ok(())
    }

    fn create_joints<B>(
        &self,
        backend: &mut B,
        chain: &Chain,
        created: &mut Vec<JointConstraint>,
    ) -> Result<()>
    where
        B: PhysicsBackend + ?Sized,
    {
        let segments = chain.segments();
        for (from, pair) in segments.windows(2).enumerate() {
            let def = JointDef::pivot(
                pair[0].body,
                pair[1].body,
                pair[0].forward_anchor(),
                pair[1].backward_anchor(),
            );
            created.push(add(backend, def, JointRole::Link { from })?);
        }

        let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
            return Ok(());
        };

        if self.close_loop {
            let def = JointDef::pivot(
                last.body,
                first.body,
                last.forward_anchor(),
                first.backward_anchor(),
            );
            created.push(add(backend, def, JointRole::Closure)?);
        }

        if let Some(pendant) = self.pendant {
            let head = backend.world_point(first.body, &first.backward_anchor())?;
            backend.set_position(pendant, head)?;

            let origin = Point2::origin();
            for (segment, anchor, role) in [
                (first, first.backward_anchor(), JointRole::PendantHead),
                (last, last.forward_anchor(), JointRole::PendantTail),
            ] {
                let def = backend.pin_at_rest(segment.body, pendant, anchor, origin)?;
                created.push(add(backend, def, role)?);
            }
        }
        Ok(())
    }
}

fn add<B>(backend: &mut B, def: JointDef, role: JointRole) -> Result<JointConstraint>
where
    B: PhysicsBackend + ?Sized,
{
    let id = backend.add_joint(def)?;
    Ok(JointConstraint { id, role, def })
}
