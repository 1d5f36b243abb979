/// Axonometric projection for the flat view, camera for the solid view
use std::f32::consts::PI;
use std::f64::consts::FRAC_PI_6;

use nalgebra::{Matrix4, Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Pixel size of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Fixed-angle oblique projection from world space onto a canvas.
///
/// The mapping is linear: world `(0, 0, 0)` lands on the canvas center and
/// every other point moves away from it by `unit` pixels per world unit.
/// Screen `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxonometricProjector {
    center: Point2<f64>,
    unit: f64,
}

impl AxonometricProjector {
    pub const ANGLE_X: f64 = FRAC_PI_6;
    pub const ANGLE_Z: f64 = FRAC_PI_6;

    pub fn new(canvas: CanvasSize, unit: f64) -> Self {
        Self {
            center: canvas.center(),
            unit,
        }
    }

    pub fn unit(&self) -> f64 {
        self.unit
    }

    pub fn project(&self, x: f64, y: f64, z: f64) -> Point2<f64> {
        let (sin_x, cos_x) = Self::ANGLE_X.sin_cos();
        let (sin_z, cos_z) = Self::ANGLE_Z.sin_cos();

        let tx = x * cos_z - z * sin_z;
        let ty = y * cos_x - (x * sin_z + z * cos_z) * sin_x;

        Point2::new(self.center.x + tx * self.unit, self.center.y - ty * self.unit)
    }

    pub fn project_point(&self, point: &Point3<f64>) -> Point2<f64> {
        self.project(point.x, point.y, point.z)
    }
}

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for the solid view
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    /// Looks at the origin from `(10, 10, 10)` with a 50 degree field of
    /// view, z up.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(10.0, 10.0, 10.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 0.0, 1.0),
            fov: 50.0 * PI / 180.0,
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 200.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Switch between perspective and orthographic projection.
    pub fn toggle_projection(&mut self) {
        self.mode = match self.mode {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        };
    }

    /// Move along the view direction, keeping the target.
    pub fn zoom(&mut self, factor: f32) {
        let offset = (self.position - self.target) * factor;
        if offset.norm() > self.near * 2.0 {
            self.position = self.target + offset;
        }
    }

    /// Project a 3D point to screen space. Returns `None` outside the view
    /// volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;

        let clip = mvp * point.to_homogeneous();
        // Behind the camera or degenerate
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        if !(-1.0..=1.0).contains(&ndc_x) || !(-1.0..=1.0).contains(&ndc_y) {
            return None;
        }

        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
