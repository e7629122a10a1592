//! Collision detection and response between orbs and against viewport walls
//!
//! Orb-orb contacts are resolved as 2D elastic collisions with area mass
//! (radius²): the normal component follows the 1-D elastic formula, the
//! tangential component is kept, and the pair is pushed apart along the normal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Bounds, Orb};

/// The point of each orb that contact distance is measured between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactAnchor {
    /// Stored position (top-left reference corner)
    #[default]
    Origin,
    /// Geometric center (`pos + radius`)
    Center,
}

impl ContactAnchor {
    #[inline]
    pub fn point(self, orb: &Orb) -> Vec2 {
        match self {
            ContactAnchor::Origin => orb.pos,
            ContactAnchor::Center => orb.center(),
        }
    }
}

/// An overlap between two orbs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the first orb's anchor toward the second's
    pub normal: Vec2,
    /// Anchor distance before resolution
    pub distance: f32,
    /// `r1 + r2 - distance` (> 0)
    pub overlap: f32,
}

/// Check whether two orbs overlap
pub fn orb_contact(a: &Orb, b: &Orb, anchor: ContactAnchor) -> Option<Contact> {
    let delta = anchor.point(b) - anchor.point(a);
    let distance = delta.length();
    let min_distance = a.radius + b.radius;

    if distance >= min_distance {
        return None;
    }

    // Coincident anchors: push apart along +x
    let normal = if distance > 0.0 { delta / distance } else { Vec2::X };
    Some(Contact {
        normal,
        distance,
        overlap: min_distance - distance,
    })
}

/// Elastic response of two bodies along `normal`
///
/// Returns the post-collision velocities. Only the normal components change:
/// u1 = ((m1 - m2) v1 + 2 m2 v2) / (m1 + m2), symmetric for u2.
pub fn elastic_response(v1: Vec2, v2: Vec2, m1: f32, m2: f32, normal: Vec2) -> (Vec2, Vec2) {
    let tangent = normal.perp();

    let v1n = v1.dot(normal);
    let v1t = v1.dot(tangent);
    let v2n = v2.dot(normal);
    let v2t = v2.dot(tangent);

    let total = m1 + m2;
    let u1 = ((m1 - m2) * v1n + 2.0 * m2 * v2n) / total;
    let u2 = ((m2 - m1) * v2n + 2.0 * m1 * v1n) / total;

    (normal * u1 + tangent * v1t, normal * u2 + tangent * v2t)
}

/// Resolve one pair: exchange normal momentum, then split the overlap evenly
///
/// Returns the contact if the orbs were overlapping.
pub fn resolve_pair(a: &mut Orb, b: &mut Orb, anchor: ContactAnchor) -> Option<Contact> {
    let contact = orb_contact(a, b, anchor)?;

    let (va, vb) = elastic_response(a.vel, b.vel, a.mass(), b.mass(), contact.normal);
    a.vel = va;
    b.vel = vb;

    let half = contact.normal * (contact.overlap / 2.0);
    a.pos -= half;
    b.pos += half;

    Some(contact)
}

/// Which viewport edge an orb touched on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    /// Left or top
    Near,
    /// Right or bottom
    Far,
}

impl WallSide {
    /// Sign of the velocity component that points back into the viewport
    #[inline]
    pub fn inward(self) -> f32 {
        match self {
            WallSide::Near => 1.0,
            WallSide::Far => -1.0,
        }
    }
}

/// Wall contacts of an orb, per axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub x: Option<WallSide>,
    pub y: Option<WallSide>,
}

impl WallContact {
    pub fn any(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

/// Check an orb's bounding box against the viewport edges (touching counts)
pub fn wall_contact(orb: &Orb, bounds: &Bounds) -> WallContact {
    let d = orb.diameter();
    let side = |lo: f32, extent: f32| {
        if lo <= 0.0 {
            Some(WallSide::Near)
        } else if lo + d >= extent {
            Some(WallSide::Far)
        } else {
            None
        }
    };
    WallContact {
        x: side(orb.pos.x, bounds.width),
        y: side(orb.pos.y, bounds.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::OrbStyle;

    fn orb(id: u32, x: f32, y: f32, vx: f32, vy: f32, radius: f32) -> Orb {
        Orb::new(id, Vec2::new(x, y), Vec2::new(vx, vy), radius, OrbStyle::LIGHT_BLUE)
    }

    fn momentum_and_energy(a: &Orb, b: &Orb, n: Vec2) -> (f32, f32) {
        let (an, bn) = (a.vel.dot(n), b.vel.dot(n));
        (
            a.mass() * an + b.mass() * bn,
            0.5 * a.mass() * an * an + 0.5 * b.mass() * bn * bn,
        )
    }

    #[test]
    fn test_no_contact_when_apart() {
        let a = orb(0, 0.0, 0.0, 0.0, 0.0, 10.0);
        let b = orb(1, 25.0, 0.0, 0.0, 0.0, 10.0);
        assert!(orb_contact(&a, &b, ContactAnchor::Origin).is_none());
        // Exactly touching is not an overlap
        let b = orb(1, 20.0, 0.0, 0.0, 0.0, 10.0);
        assert!(orb_contact(&a, &b, ContactAnchor::Origin).is_none());
    }

    #[test]
    fn test_equal_mass_head_on_swaps_velocities() {
        let mut a = orb(0, 0.0, 0.0, 2.0, 0.0, 10.0);
        let mut b = orb(1, 15.0, 0.0, -1.0, 0.0, 10.0);
        resolve_pair(&mut a, &mut b, ContactAnchor::Origin).unwrap();
        assert!((a.vel.x - (-1.0)).abs() < 1e-5);
        assert!((b.vel.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_unequal_mass_conserves_normal_momentum_and_energy() {
        let mut a = orb(0, 0.0, 0.0, 3.0, 1.5, 20.0);
        let mut b = orb(1, 30.0, 20.0, -2.0, 0.5, 35.0);
        let n = orb_contact(&a, &b, ContactAnchor::Origin).unwrap().normal;
        let t = n.perp();
        let (p0, e0) = momentum_and_energy(&a, &b, n);
        let (at0, bt0) = (a.vel.dot(t), b.vel.dot(t));

        resolve_pair(&mut a, &mut b, ContactAnchor::Origin).unwrap();
        let (p1, e1) = momentum_and_energy(&a, &b, n);

        assert!((p0 - p1).abs() <= 1e-3 * p0.abs().max(1.0), "momentum {p0} -> {p1}");
        assert!((e0 - e1).abs() <= 1e-3 * e0.abs().max(1.0), "energy {e0} -> {e1}");
        assert!((a.vel.dot(t) - at0).abs() < 1e-4);
        assert!((b.vel.dot(t) - bt0).abs() < 1e-4);
    }

    #[test]
    fn test_separation_restores_contact_distance() {
        let mut a = orb(0, 100.0, 100.0, 0.0, 0.0, 20.0);
        let mut b = orb(1, 130.0, 100.0, 0.0, 0.0, 30.0);
        let (a0, b0) = (a.pos, b.pos);

        let contact = resolve_pair(&mut a, &mut b, ContactAnchor::Origin).unwrap();
        assert!((contact.overlap - 20.0).abs() < 1e-4);
        assert!(((b.pos - a.pos).length() - 50.0).abs() < 1e-3);
        assert!(((a.pos - a0).length() - 10.0).abs() < 1e-4);
        assert!(((b.pos - b0).length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_center_anchor_uses_true_centers() {
        // Origins 45 apart, centers ~55.9 apart: only the origin anchor sees overlap
        let a = orb(0, 0.0, 100.0, 0.0, 0.0, 20.0);
        let b = orb(1, 45.0, 100.0, 0.0, 0.0, 30.0);
        assert!(orb_contact(&a, &b, ContactAnchor::Origin).is_some());
        assert!(orb_contact(&a, &b, ContactAnchor::Center).is_none());

        let mut a = orb(0, 0.0, 0.0, 0.0, 0.0, 20.0);
        let mut b = orb(1, 30.0, -10.0, 0.0, 0.0, 30.0);
        resolve_pair(&mut a, &mut b, ContactAnchor::Center).unwrap();
        assert!(((b.center() - a.center()).length() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_coincident_orbs_separate_along_x() {
        let mut a = orb(0, 50.0, 50.0, 1.0, 0.0, 10.0);
        let mut b = orb(1, 50.0, 50.0, -1.0, 0.0, 10.0);
        let contact = resolve_pair(&mut a, &mut b, ContactAnchor::Origin).unwrap();
        assert_eq!(contact.normal, Vec2::X);
        assert!(a.pos.is_finite() && b.pos.is_finite());
        assert!(a.vel.is_finite() && b.vel.is_finite());
        assert!(((b.pos - a.pos).length() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_wall_contact_sides() {
        let bounds = Bounds::new(200.0, 100.0);
        let c = wall_contact(&orb(0, -1.0, 30.0, 0.0, 0.0, 10.0), &bounds);
        assert_eq!(c.x, Some(WallSide::Near));
        assert_eq!(c.y, None);

        let c = wall_contact(&orb(0, 185.0, 85.0, 0.0, 0.0, 10.0), &bounds);
        assert_eq!(c.x, Some(WallSide::Far));
        assert_eq!(c.y, Some(WallSide::Far));

        assert!(!wall_contact(&orb(0, 50.0, 50.0, 0.0, 0.0, 10.0), &bounds).any());
    }
}
