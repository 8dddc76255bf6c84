//! Perspective camera used for projection and pointer picking

use crate::types::{Ray, Vec2, Vec3};

/// A point projected into screen space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// Screen position in pixels, origin top-left
    pub screen: Vec2,
    /// Distance along the view direction
    pub depth: f32,
    /// Pixels per world unit at this depth
    pub pixels_per_unit: f32,
}

/// A 3D perspective camera orbiting a target point
#[derive(Clone, Debug)]
pub struct Camera {
    /// Camera position
    pub position: Vec3,
    /// Target point the camera looks at
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance from target
    pub distance: f32,
    /// Horizontal angle in radians
    pub yaw: f32,
    /// Vertical angle in radians
    pub pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::UP,
            fov: 65.0,
            near: 0.1,
            far: 250.0,
            aspect: 16.0 / 9.0,
            distance: (12.0f32 * 12.0 + 45.0 * 45.0).sqrt(),
            yaw: 0.0,
            pitch: 12.0f32.atan2(45.0),
        };
        camera.update_orbit();
        camera
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update position based on orbit parameters
    pub fn update_orbit(&mut self) {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();

        self.position = Vec3::new(self.target.x + x, self.target.y + y, self.target.z + z);
    }

    /// Set the aspect ratio from a pixel size; ignores degenerate sizes
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Orthonormal (right, up, forward) basis
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position).normalized();
        let right = forward.cross(&self.up).normalized();
        let up = right.cross(&forward);
        (right, up, forward)
    }

    fn half_fov_tan(&self) -> f32 {
        (self.fov.to_radians() / 2.0).tan()
    }

    /// Project a world point to screen pixels. Returns `None` outside the
    /// near/far range.
    pub fn project(&self, point: Vec3, width: u32, height: u32) -> Option<Projected> {
        let (right, up, forward) = self.basis();
        let rel = point - self.position;
        let depth = rel.dot(&forward);
        if depth <= self.near || depth >= self.far {
            return None;
        }

        let half_h = depth * self.half_fov_tan();
        let half_w = half_h * self.aspect;
        let ndc_x = rel.dot(&right) / half_w;
        let ndc_y = rel.dot(&up) / half_h;

        let w = width as f32;
        let h = height as f32;
        Some(Projected {
            screen: Vec2::new((ndc_x + 1.0) * 0.5 * w, (1.0 - ndc_y) * 0.5 * h),
            depth,
            pixels_per_unit: h * 0.5 / half_h,
        })
    }

    /// Ray from the camera through a screen pixel
    pub fn screen_ray(&self, x: f32, y: f32, width: u32, height: u32) -> Ray {
        let (right, up, forward) = self.basis();
        let ndc_x = (x / width.max(1) as f32) * 2.0 - 1.0;
        let ndc_y = 1.0 - (y / height.max(1) as f32) * 2.0;
        let tan = self.half_fov_tan();
        let dir = forward + right * (ndc_x * tan * self.aspect) + up * (ndc_y * tan);
        Ray::new(self.position, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_scene_camera() {
        let cam = Camera::new();
        assert!((cam.position.x).abs() < 1e-4);
        assert!((cam.position.y - 12.0).abs() < 1e-3);
        assert!((cam.position.z - 45.0).abs() < 1e-3);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let cam = Camera::new();
        let p = cam.project(Vec3::ZERO, 1600, 900).unwrap();
        assert!((p.screen.x - 800.0).abs() < 0.01);
        assert!((p.screen.y - 450.0).abs() < 0.01);
        assert!(p.depth > 0.0);
    }

    #[test]
    fn behind_camera_is_not_projected() {
        let cam = Camera::new();
        assert!(cam.project(Vec3::new(0.0, 12.0, 60.0), 800, 600).is_none());
    }

    #[test]
    fn screen_ray_hits_projected_point() {
        let mut cam = Camera::new();
        cam.set_viewport(1280, 720);
        let point = Vec3::new(8.0, -3.0, 5.0);
        let p = cam.project(point, 1280, 720).unwrap();
        let ray = cam.screen_ray(p.screen.x, p.screen.y, 1280, 720);
        let t = ray.intersect_sphere(point, 0.05);
        assert!(t.is_some());
    }
}
