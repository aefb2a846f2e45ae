//! Camera contract and orbit reference camera

use std::any::Any;

use crate::foundation::math::{Mat4, Point3, Vec3};

/// Contract for the camera sub-system slot
///
/// The orchestrator only requires the delta-time update; the viewpoint
/// surface is consumed by renderers and callers.
pub trait CameraComponent {
    /// Advance camera-internal state by `delta` seconds
    fn update(&mut self, delta: f32);

    /// World-to-view matrix for the current viewpoint
    fn view_matrix(&self) -> Mat4;

    /// Projection matrix for the given aspect ratio
    fn projection_matrix(&self, aspect: f32) -> Mat4;

    /// World-space eye position
    fn position(&self) -> Point3;

    /// Downcast to Any for type-specific access
    fn as_any(&self) -> &dyn Any;

    /// Downcast to Any for mutable type-specific access
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Orbit camera circling a target point
///
/// Orbit, zoom, and pan requests set goal values; the per-frame update
/// eases the live values toward them for smooth motion.
pub struct OrbitCamera {
    target: Point3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    goal_yaw: f32,
    goal_pitch: f32,
    goal_distance: f32,
    smoothing: f32,
    fovy: f32,
}

impl OrbitCamera {
    /// Pitch limit keeping the camera off the poles
    const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

    /// Create an orbit camera at the given distance from the origin
    pub fn new(distance: f32) -> Self {
        let distance = distance.max(0.1);
        Self {
            target: Point3::origin(),
            yaw: 0.0,
            pitch: 0.4,
            distance,
            goal_yaw: 0.0,
            goal_pitch: 0.4,
            goal_distance: distance,
            smoothing: 10.0,
            fovy: std::f32::consts::FRAC_PI_4,
        }
    }

    /// Set the point the camera orbits around
    pub fn set_target(&mut self, target: Point3) {
        self.target = target;
    }

    /// Request an orbit by yaw/pitch deltas in radians
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.goal_yaw += delta_yaw;
        self.goal_pitch = (self.goal_pitch + delta_pitch).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
    }

    /// Request a zoom by a distance multiplier
    pub fn zoom(&mut self, factor: f32) {
        if factor > 0.0 {
            self.goal_distance = (self.goal_distance * factor).max(0.1);
        }
    }

    /// Current distance from the target
    pub fn distance(&self) -> f32 {
        self.distance
    }
}

impl CameraComponent for OrbitCamera {
    fn update(&mut self, delta: f32) {
        // Exponential ease toward the goal values, framerate-independent.
        let t = 1.0 - (-self.smoothing * delta).exp();
        self.yaw += (self.goal_yaw - self.yaw) * t;
        self.pitch += (self.goal_pitch - self.pitch) * t;
        self.distance += (self.goal_distance - self.distance) * t;
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(&self.position(), &self.target, &Vec3::y())
    }

    fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::new_perspective(aspect, self.fovy, 0.1, 10_000.0)
    }

    fn position(&self) -> Point3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        let offset = Vec3::new(cy * cp, sp, sy * cp) * self.distance;
        self.target + offset
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_position_sits_at_requested_distance() {
        let camera = OrbitCamera::new(10.0);
        let offset = camera.position() - Point3::origin();
        assert_relative_eq!(offset.magnitude(), 10.0, epsilon = 1.0e-4);
    }

    #[test]
    fn test_update_eases_toward_orbit_goal() {
        let mut camera = OrbitCamera::new(10.0);
        camera.orbit(1.0, 0.0);
        let before = camera.position();

        camera.update(0.05);
        let mid = camera.position();
        assert!((mid - before).magnitude() > 1.0e-4);

        // A long enough update converges on the goal.
        camera.update(10.0);
        let settled = camera.position();
        camera.update(10.0);
        assert_relative_eq!((camera.position() - settled).magnitude(), 0.0, epsilon = 1.0e-3);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::new(5.0);
        camera.orbit(0.0, 100.0);
        camera.update(100.0);
        assert!(camera.position().y <= 5.0 + 1.0e-3);
    }

    #[test]
    fn test_zoom_shrinks_distance() {
        let mut camera = OrbitCamera::new(10.0);
        camera.zoom(0.5);
        camera.update(100.0);
        assert_relative_eq!(camera.distance(), 5.0, epsilon = 1.0e-2);
    }

    #[test]
    fn test_view_matrix_looks_at_target() {
        let camera = OrbitCamera::new(10.0);
        let view = camera.view_matrix();
        let target_in_view = view.transform_point(&Point3::origin());
        // The target lies straight ahead on the view-space -Z axis.
        assert_relative_eq!(target_in_view.x, 0.0, epsilon = 1.0e-4);
        assert_relative_eq!(target_in_view.y, 0.0, epsilon = 1.0e-4);
        assert_relative_eq!(target_in_view.z, -10.0, epsilon = 1.0e-3);
    }
}
