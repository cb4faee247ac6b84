/// Camera position used as the projection's reference point
use nalgebra::{Point3, Vector3};

use crate::matrix::Matrix;

/// Camera z offset behind the origin.
pub const DEFAULT_CAMERA_Z: f64 = -15.0;

/// A mutable 3D position.
///
/// The renderer reads the position once per render call, so writes must
/// happen between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f64>,
}

impl Camera {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn z(&self) -> f64 {
        self.position.z
    }

    pub fn set_x(&mut self, x: f64) {
        self.position.x = x;
    }

    pub fn set_y(&mut self, y: f64) {
        self.position.y = y;
    }

    pub fn set_z(&mut self, z: f64) {
        self.position.z = z;
    }

    pub fn set_position(&mut self, x: f64, y: f64, z: f64) {
        self.position = Point3::new(x, y, z);
    }

    /// Move by delta amounts
    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.position += Vector3::new(dx, dy, dz);
    }

    /// The position as a 3×1 column matrix
    pub fn position_matrix(&self) -> Matrix {
        Matrix::point(self.position.x, self.position.y, self.position.z)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(0.0, 0.0, DEFAULT_CAMERA_Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_position() {
        let camera = Camera::default();
        assert_eq!((camera.x(), camera.y(), camera.z()), (0.0, 0.0, -15.0));
    }

    #[test]
    fn test_translate() {
        let mut camera = Camera::default();
        camera.translate(1.0, -2.0, 0.5);
        assert!((camera.x() - 1.0).abs() < 1e-12);
        assert!((camera.y() + 2.0).abs() < 1e-12);
        assert!((camera.z() + 14.5).abs() < 1e-12);
    }

    #[test]
    fn test_position_matrix() {
        let mut camera = Camera::default();
        camera.set_position(1.0, 2.0, 3.0);
        camera.set_y(5.0);
        let m = camera.position_matrix();
        assert_eq!(m.shape(), (3, 1));
        assert_eq!((m[(0, 0)], m[(1, 0)], m[(2, 0)]), (1.0, 5.0, 3.0));
    }
}
