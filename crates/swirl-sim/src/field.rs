//! The vortex force field: radial push + lateral curl + uniform gravity

use swirl_core::Vec3;

/// Scale applied to the outward vector before it is re-normalized.
const OUTWARD_DISTANCE_SCALE: f32 = 120.0;

/// Positions closer to the center than this get no radial/curl force.
const CENTER_EPSILON: f32 = 1e-6;

/// Pure mapping from world position to instantaneous force.
#[derive(Clone, Copy, Debug)]
pub struct ForceField {
    pub center: Vec3,
    pub gravity: Vec3,
    pub curl: f32,
}

impl ForceField {
    pub fn new(center: Vec3, gravity: Vec3, curl: f32) -> Self {
        Self {
            center,
            gravity,
            curl,
        }
    }

    /// Evaluate the field at a world position.
    ///
    /// A position coinciding with the center has no defined radial
    /// direction; only gravity contributes there (never NaN).
    pub fn at(&self, position: Vec3) -> Vec3 {
        let offset = position - self.center;
        let dist = offset.length();
        if dist <= CENTER_EPSILON {
            return self.gravity;
        }

        let radial = offset.normalized();
        // TODO: decide whether the outward force should attenuate with
        // distance; the division is discarded by the renormalize, so the
        // magnitude is always 1. Kept as-is until that's settled.
        let outward = (radial / (dist * OUTWARD_DISTANCE_SCALE)).normalized();
        let tangent = Vec3::UP.cross(&outward).normalized() * self.curl;

        outward + tangent + self.gravity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_field(curl: f32) -> ForceField {
        ForceField::new(Vec3::ZERO, Vec3::ZERO, curl)
    }

    #[test]
    fn opposite_positions_give_antiparallel_outward() {
        let field = plain_field(0.0);
        let a = field.at(Vec3::new(3.0, 0.0, 1.0));
        let b = field.at(Vec3::new(-3.0, 0.0, -1.0));
        assert!((a + b).length() < 1e-5);
    }

    #[test]
    fn zero_curl_is_purely_radial() {
        let field = plain_field(0.0);
        let pos = Vec3::new(2.0, 0.5, -1.0);
        let force = field.at(pos);
        let radial = pos.normalized();
        // No tangential component: force is parallel to the radial direction
        assert!((force - radial * force.dot(&radial)).length() < 1e-5);
        // And unit magnitude regardless of distance
        assert!((force.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn curl_adds_perpendicular_component() {
        let field = plain_field(2.0);
        let pos = Vec3::new(1.0, 0.0, 0.0);
        let force = field.at(pos);
        let radial = pos.normalized();
        let tangential = force - radial * force.dot(&radial);
        assert!((tangential.length() - 2.0).abs() < 1e-5);
        // Tangent is perpendicular to world up as well
        assert!(tangential.dot(&Vec3::UP).abs() < 1e-5);
    }

    #[test]
    fn outward_direction_ignores_distance() {
        let field = plain_field(0.0);
        let near = field.at(Vec3::new(0.01, 0.0, 0.0));
        let far = field.at(Vec3::new(100.0, 0.0, 0.0));
        assert!((near - far).length() < 1e-5);
    }

    #[test]
    fn center_position_yields_gravity_only() {
        let gravity = Vec3::new(0.0, 0.25, 0.0);
        let field = ForceField::new(Vec3::new(0.0, 2.0, 0.0), gravity, 1.0);
        let force = field.at(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(force, gravity);
        assert!(force.x.is_finite() && force.y.is_finite() && force.z.is_finite());
    }

    #[test]
    fn gravity_is_additive_and_not_inverted() {
        let gravity = Vec3::new(0.0, 3.0, 0.0);
        let with = ForceField::new(Vec3::ZERO, gravity, 0.0).at(Vec3::new(1.0, 0.0, 0.0));
        let without = plain_field(0.0).at(Vec3::new(1.0, 0.0, 0.0));
        let diff = with - without;
        // Positive configured gravity pushes straight up
        assert!((diff - gravity).length() < 1e-6);
    }
}
