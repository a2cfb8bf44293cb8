use defocus_common::Ray;
use glam::{Mat4, Vec2, Vec3};

/// Closest the camera may dolly toward the pivot.
pub const MIN_DISTANCE: f32 = 5.0;
/// Farthest the camera may dolly from the pivot.
pub const MAX_DISTANCE: f32 = 45.0;

/// Orbit camera pivoting around a fixed target.
///
/// Mouse drags adjust yaw/pitch, the scroll wheel dollies. The distance is
/// clamped once per simulation tick rather than on every input event, so a
/// fast scroll feels continuous but the camera never leaves the scene.
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    pub dolly_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // Matches an eye at (1, 2, 5) looking at the origin.
        Self {
            target: Vec3::ZERO,
            distance: 30.0_f32.sqrt(),
            yaw: (1.0_f32 / 5.0).atan(),
            pitch: (2.0_f32 / 30.0_f32.sqrt()).asin(),
            fov_deg: 25.0,
            aspect: 16.0 / 9.0,
            near: 0.05,
            far: 100.0,
            sensitivity: 0.005,
            dolly_speed: 1.5,
        }
    }
}

impl OrbitCamera {
    /// Direction from the target to the eye.
    fn orbit_dir(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        )
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.orbit_dir() * self.distance
    }

    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity)
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    pub fn dolly(&mut self, scroll: f32) {
        self.distance = (self.distance - scroll * self.dolly_speed).max(0.1);
    }

    /// Keep the pivot distance inside the scene. Called once per tick.
    pub fn clamp_distance(&mut self) {
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the eye through a cursor position, in world space.
    /// `screen_pos` is in physical pixels with the origin at the top left.
    pub fn screen_ray(&self, screen_pos: Vec2, viewport: Vec2) -> Ray {
        let ndc = Vec2::new(
            2.0 * screen_pos.x / viewport.x - 1.0,
            1.0 - 2.0 * screen_pos.y / viewport.y,
        );
        let inv = self.view_projection().inverse();
        let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(near, far - near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_eye_position() {
        let cam = OrbitCamera::default();
        let eye = cam.eye();
        assert!((eye - Vec3::new(1.0, 2.0, 5.0)).length() < 1e-3);
    }

    #[test]
    fn view_projection_is_finite() {
        let cam = OrbitCamera::default();
        let vp = cam.view_projection();
        assert!(vp.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn distance_clamps_into_scene_range() {
        let mut cam = OrbitCamera::default();
        cam.dolly(1000.0);
        cam.clamp_distance();
        assert_eq!(cam.distance, MIN_DISTANCE);
        cam.dolly(-1000.0);
        cam.clamp_distance();
        assert_eq!(cam.distance, MAX_DISTANCE);
    }

    #[test]
    fn pitch_stays_off_the_poles() {
        let mut cam = OrbitCamera::default();
        cam.orbit(0.0, 1.0e6);
        assert!(cam.pitch < 90.0_f32.to_radians());
        cam.orbit(0.0, -1.0e6);
        assert!(cam.pitch > -90.0_f32.to_radians());
    }

    #[test]
    fn center_ray_points_at_the_target() {
        let cam = OrbitCamera::default();
        let viewport = Vec2::new(960.0, 540.0);
        let ray = cam.screen_ray(viewport * 0.5, viewport);
        let to_target = (cam.target - ray.origin).normalize();
        assert!(ray.direction.dot(to_target) > 0.999);
    }

    #[test]
    fn corner_rays_diverge() {
        let cam = OrbitCamera::default();
        let viewport = Vec2::new(960.0, 540.0);
        let a = cam.screen_ray(Vec2::ZERO, viewport);
        let b = cam.screen_ray(viewport, viewport);
        assert!(a.direction.dot(b.direction) < 0.9999);
    }
}
