//! Position-based sub-stepping.
//!
//! Each sub-step of length `h`:
//!
//! 1. Integrate external forces, gravity and damping into velocities, then
//!    velocities into poses.
//! 2. Detect contacts between filtered shape pairs.
//! 3. For `iterations` passes, project joint and contact constraints
//!    directly on the poses (zero compliance).
//! 4. Derive velocities from the pose change over the sub-step.
//! 5. Replace the normal velocity of touching pairs with the restitution
//!    response and apply dynamic friction.
//!
//! Position projection uses generalized inverse masses
//! `w = 1/m + (r × n)² / I` for each body at its lever arm `r`.

use hashbrown::HashMap;
use nalgebra::{Point2, Vector2};
use sim_planar_types::{BodyId, JointDef, Pose2, SimulationConfig, Velocity2};

use crate::contact::{capsule_contact, Capsule};
use crate::world::{Body, Joint};

/// A joint with its bodies resolved to slots.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Link {
    a: usize,
    b: usize,
    def: JointDef,
}

/// Resolve joint body IDs to body slots, skipping dangling joints.
pub(crate) fn resolve_joints(joints: &[Joint], index: &HashMap<BodyId, usize>) -> Vec<Link> {
    joints
        .iter()
        .filter_map(|joint| {
            let a = *index.get(&joint.def.body_a)?;
            let b = *index.get(&joint.def.body_b)?;
            Some(Link {
                a,
                b,
                def: joint.def,
            })
        })
        .collect()
}

/// A contact between two bodies, fixed for one sub-step.
#[derive(Debug, Clone, Copy)]
struct Contact {
    a: usize,
    b: usize,
    /// From `a` into `b`.
    normal: Vector2<f64>,
    local_a: Point2<f64>,
    local_b: Point2<f64>,
    /// Accumulated normal correction.
    lambda: f64,
    /// Relative normal velocity before the position solve.
    normal_velocity: f64,
    friction: f64,
    restitution: f64,
}

fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Mutable access to two distinct slots.
fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> (&mut Body, &mut Body) {
    if a < b {
        let (lo, hi) = bodies.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

/// Generalized inverse mass of `body` for a correction along `n` at arm `r`.
fn generalized_inverse_mass(body: &Body, r: &Vector2<f64>, n: &Vector2<f64>) -> f64 {
    let rn = cross(r, n);
    body.inverse_mass() + rn * rn * body.inverse_inertia()
}

/// Shift `a` by `-p` and `b` by `+p` at the given arms.
fn apply_positional(
    a: &mut Body,
    b: &mut Body,
    r_a: &Vector2<f64>,
    r_b: &Vector2<f64>,
    p: &Vector2<f64>,
) {
    let (wa, ia) = (a.inverse_mass(), a.inverse_inertia());
    let (wb, ib) = (b.inverse_mass(), b.inverse_inertia());
    a.pose.position -= p * wa;
    a.pose.angle -= cross(r_a, p) * ia;
    b.pose.position += p * wb;
    b.pose.angle += cross(r_b, p) * ib;
}

/// Change `a`'s and `b`'s velocities by `-p` and `+p` impulses.
fn apply_impulse(
    a: &mut Body,
    b: &mut Body,
    r_a: &Vector2<f64>,
    r_b: &Vector2<f64>,
    p: &Vector2<f64>,
) {
    let (wa, ia) = (a.inverse_mass(), a.inverse_inertia());
    let (wb, ib) = (b.inverse_mass(), b.inverse_inertia());
    a.velocity.linear -= p * wa;
    a.velocity.angular -= cross(r_a, p) * ia;
    b.velocity.linear += p * wb;
    b.velocity.angular += cross(r_b, p) * ib;
}

fn integrate(bodies: &mut [Body], config: &SimulationConfig, h: f64) {
    let keep = config.damping.powf(h);
    for body in bodies.iter_mut().filter(|b| !b.is_static()) {
        let accel = config.gravity + body.accumulated_force * body.inverse_mass();
        body.velocity.linear = (body.velocity.linear + accel * h) * keep;
        body.velocity.angular =
            (body.velocity.angular + body.accumulated_torque * body.inverse_inertia() * h) * keep;
        body.pose.position += body.velocity.linear * h;
        body.pose.angle += body.velocity.angular * h;
    }
}

fn solve_joint(bodies: &mut [Body], link: &Link) {
    let (a, b) = pair_mut(bodies, link.a, link.b);
    let world_a = a.world_point(&link.def.anchor_a);
    let world_b = b.world_point(&link.def.anchor_b);
    let delta = world_b - world_a;
    let dist = delta.norm();
    if dist <= f64::EPSILON {
        return;
    }
    let n = delta / dist;
    let c = dist - link.def.kind.rest_length();

    let r_a = world_a - a.pose.position;
    let r_b = world_b - b.pose.position;
    let w = generalized_inverse_mass(a, &r_a, &n) + generalized_inverse_mass(b, &r_b, &n);
    if w <= 0.0 {
        return;
    }

    let p = n * (-c / w);
    apply_positional(a, b, &r_a, &r_b, &p);
}

fn detect_contacts(bodies: &[Body]) -> Vec<Contact> {
    let capsules: Vec<Capsule> = bodies
        .iter()
        .map(|b| Capsule::from_shape(&b.shape, &b.pose))
        .collect();

    let mut contacts = Vec::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (a, b) = (&bodies[i], &bodies[j]);
            if (a.is_static() && b.is_static()) || !a.filter.can_collide_with(&b.filter) {
                continue;
            }
            let Some(geometry) = capsule_contact(&capsules[i], &capsules[j]) else {
                continue;
            };

            let r_a = geometry.point_a - a.pose.position;
            let r_b = geometry.point_b - b.pose.position;
            let relative = b.velocity.velocity_at_offset(&r_b) - a.velocity.velocity_at_offset(&r_a);
            contacts.push(Contact {
                a: i,
                b: j,
                normal: geometry.normal,
                local_a: a.pose.inverse_transform_point(&geometry.point_a),
                local_b: b.pose.inverse_transform_point(&geometry.point_b),
                lambda: 0.0,
                normal_velocity: relative.dot(&geometry.normal),
                friction: a.material.friction * b.material.friction,
                restitution: a.material.elasticity * b.material.elasticity,
            });
        }
    }
    contacts
}

fn solve_contact(bodies: &mut [Body], contact: &mut Contact) {
    let (a, b) = pair_mut(bodies, contact.a, contact.b);
    let world_a = a.world_point(&contact.local_a);
    let world_b = b.world_point(&contact.local_b);
    let depth = (world_a - world_b).dot(&contact.normal);
    if depth <= 0.0 {
        return;
    }

    let n = contact.normal;
    let r_a = world_a - a.pose.position;
    let r_b = world_b - b.pose.position;
    let w = generalized_inverse_mass(a, &r_a, &n) + generalized_inverse_mass(b, &r_b, &n);
    if w <= 0.0 {
        return;
    }

    let lambda = depth / w;
    contact.lambda += lambda;
    apply_positional(a, b, &r_a, &r_b, &(n * lambda));
}

fn respond(bodies: &mut [Body], contact: &Contact, gravity: f64, h: f64) {
    if contact.lambda <= 0.0 {
        return;
    }
    let (a, b) = pair_mut(bodies, contact.a, contact.b);
    let n = contact.normal;
    let r_a = a.pose.transform_vector(&contact.local_a.coords);
    let r_b = b.pose.transform_vector(&contact.local_b.coords);
    let v = b.velocity.velocity_at_offset(&r_b) - a.velocity.velocity_at_offset(&r_a);
    let vn = v.dot(&n);
    let vt = v - n * vn;

    // Resting contacts do not bounce.
    let restitution = if contact.normal_velocity.abs() > 2.0 * gravity * h {
        contact.restitution
    } else {
        0.0
    };
    let target = (-restitution * contact.normal_velocity).max(0.0);
    let mut dv = n * (target - vn);

    let speed = vt.norm();
    if speed > f64::EPSILON {
        let limit = (contact.friction * contact.lambda / h).min(speed);
        dv -= vt * (limit / speed);
    }

    let magnitude = dv.norm();
    if magnitude <= f64::EPSILON {
        return;
    }
    let dir = dv / magnitude;
    let w = generalized_inverse_mass(a, &r_a, &dir) + generalized_inverse_mass(b, &r_b, &dir);
    if w <= 0.0 {
        return;
    }
    apply_impulse(a, b, &r_a, &r_b, &(dv / w));
}

/// Advance all bodies by one sub-step of length `h`.
pub(crate) fn substep(bodies: &mut [Body], links: &[Link], config: &SimulationConfig, h: f64) {
    let previous: Vec<Pose2> = bodies.iter().map(|b| b.pose).collect();
    integrate(bodies, config, h);

    let mut contacts = if config.enable_contacts {
        detect_contacts(bodies)
    } else {
        Vec::new()
    };

    for _ in 0..config.iterations.max(1) {
        for link in links {
            solve_joint(bodies, link);
        }
        for contact in &mut contacts {
            solve_contact(bodies, contact);
        }
    }

    for (body, prev) in bodies.iter_mut().zip(&previous) {
        if body.is_static() {
            body.velocity = Velocity2::zero();
            continue;
        }
        body.velocity.linear = (body.pose.position - prev.position) / h;
        body.velocity.angular = (body.pose.angle - prev.angle) / h;
    }

    let gravity = config.gravity.norm();
    for contact in &contacts {
        respond(bodies, contact, gravity, h);
    }
}
