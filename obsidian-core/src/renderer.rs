/// Camera-relative perspective projection of meshes into screen polygons
use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::geometry::{Mesh, Object};
use crate::matrix::Matrix;
use crate::surface::{Color, DrawingSurface, WindowSize};

/// Scales camera-space depth before the perspective divide.
pub const DEPTH_FACTOR: f64 = 0.05;
/// Numerator of the inverse-distance scale.
pub const PROJECTION_SCALE: f64 = 60.0;
/// Viewing angle whose sine weights the depth. A right angle keeps the
/// weight at 1.
pub const FIELD_OF_VIEW_DEGREES: f64 = 90.0;
/// Faces whose summed-centroid depth is at or below this are not projected.
pub const FACE_DEPTH_THRESHOLD: f64 = -1.5;
/// Vertices whose depth is at or below this are not projected.
pub const VERTEX_DEPTH_THRESHOLD: f64 = -0.01;

/// Integer screen coordinates of one projected mesh.
///
/// Vertices that fail the visibility gate stay at `(0, 0)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenPolygon {
    pub xs: Vec<i32>,
    pub ys: Vec<i32>,
}

impl ScreenPolygon {
    fn zeroed(len: usize) -> Self {
        Self {
            xs: vec![0; len],
            ys: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

fn depth(z: f64, camera_z: f64) -> f64 {
    DEPTH_FACTOR * (z - camera_z)
}

fn weighted_distance(camera_dist_z: f64) -> f64 {
    camera_dist_z * FIELD_OF_VIEW_DEGREES.to_radians().sin() / 2.0
}

/// Projects meshes against an owned camera and emits them to a surface.
#[derive(Debug, Clone)]
pub struct Renderer {
    scale_factor: Matrix,
    camera: Camera,
}

impl Renderer {
    /// Create a renderer from a 2×3 base scale matrix.
    ///
    /// The diagonal `(0, 0)` and `(1, 1)` entries are the x/y scale; the other
    /// entries are copied into the projection matrix unchanged.
    pub fn new(scale_factor: Matrix) -> Result<Self> {
        if scale_factor.shape() != (2, 3) {
            return Err(Error::DimensionMismatch {
                left: scale_factor.shape(),
                right: (2, 3),
            });
        }
        Ok(Self {
            scale_factor,
            camera: Camera::default(),
        })
    }

    /// Renderer with independent x/y scale and no cross terms.
    pub fn with_scale(scale_x: f64, scale_y: f64) -> Self {
        Self {
            scale_factor: Matrix::from_array([[scale_x, 0.0, 0.0], [0.0, scale_y, 0.0]]),
            camera: Camera::default(),
        }
    }

    pub fn scale_factor(&self) -> &Matrix {
        &self.scale_factor
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Project every vertex of `mesh` to integer screen coordinates.
    pub fn project_mesh(&self, mesh: &Mesh, window: WindowSize) -> Result<ScreenPolygon> {
        let camera_pos = self.camera.position_matrix();
        let (camera_x, camera_y, camera_z) =
            (camera_pos[(0, 0)], camera_pos[(1, 0)], camera_pos[(2, 0)]);

        let half_width = f64::from(window.width) / 2.0;
        let half_height = f64::from(window.height) / 2.0;

        let middle = weighted_distance(depth(mesh.centroid()[(2, 0)], camera_z));
        let sf = &self.scale_factor;

        let mut polygon = ScreenPolygon::zeroed(mesh.len());
        for (i, vertex) in mesh.vertices().iter().enumerate() {
            let camera_dist_z = depth(vertex[(2, 0)], camera_z);
            let distance = weighted_distance(camera_dist_z);

            if middle <= FACE_DEPTH_THRESHOLD || distance <= VERTEX_DEPTH_THRESHOLD {
                log::trace!(
                    "vertex {} culled (face depth {:.4}, vertex depth {:.4})",
                    i,
                    middle,
                    distance
                );
                continue;
            }

            let scale = Matrix::from_array([
                [
                    sf[(0, 0)] * PROJECTION_SCALE / distance,
                    sf[(0, 1)],
                    sf[(0, 2)],
                    0.5,
                ],
                [
                    sf[(1, 0)],
                    sf[(1, 1)] * PROJECTION_SCALE / distance,
                    sf[(1, 2)],
                    0.5,
                ],
            ]);
            let relative = Matrix::from_array([
                [vertex[(0, 0)] - camera_x],
                [vertex[(1, 0)] - camera_y],
                [camera_dist_z],
                [0.0],
            ]);
            let projected = scale.multiply(&relative)?;

            polygon.xs[i] = (projected[(0, 0)] + half_width).round() as i32;
            polygon.ys[i] = (projected[(1, 0)] + half_height).round() as i32;
        }

        Ok(polygon)
    }

    /// Project `mesh` and hand it to `surface` as an outline or a filled polygon.
    pub fn render_mesh<S: DrawingSurface + ?Sized>(
        &self,
        mesh: &Mesh,
        color: Color,
        filled: bool,
        surface: &mut S,
        window: WindowSize,
    ) -> Result<()> {
        let polygon = self.project_mesh(mesh, window)?;
        log::debug!(
            "emitting {} polygon with {} vertices",
            if filled { "filled" } else { "outlined" },
            polygon.len()
        );

        if filled {
            surface.fill_polygon(&polygon.xs, &polygon.ys, color);
        } else {
            surface.draw_polygon(&polygon.xs, &polygon.ys, color);
        }
        Ok(())
    }

    /// Render each mesh of `object` in sequence order, without depth sorting.
    pub fn render_object<S: DrawingSurface + ?Sized>(
        &self,
        object: &Object,
        color: Color,
        filled: bool,
        surface: &mut S,
        window: WindowSize,
    ) -> Result<()> {
        for mesh in object.meshes() {
            self.render_mesh(mesh, color, filled, surface, window)?;
        }
        Ok(())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::with_scale(1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    const WINDOW: WindowSize = WindowSize {
        width: 800,
        height: 600,
    };

    #[test]
    fn test_golden_projection_chain() {
        let renderer = Renderer::with_scale(1.0, 1.0);
        let camera_dist_z = depth(0.0, renderer.camera().z());
        assert!((camera_dist_z - 0.75).abs() < 1e-12);
        let distance = weighted_distance(camera_dist_z);
        assert!((distance - 0.375).abs() < 1e-12);
        assert!((PROJECTION_SCALE / distance - 160.0).abs() < 1e-9);

        let mesh = Mesh::from_points(&[[0.0, 0.0, 0.0]]);
        let polygon = renderer.project_mesh(&mesh, WINDOW).unwrap();
        assert_eq!(polygon.xs, vec![400]);
        assert_eq!(polygon.ys, vec![300]);
    }

    #[test]
    fn test_projection_scales_by_inverse_distance() {
        let renderer = Renderer::with_scale(1.0, 1.0);
        let mesh = Mesh::from_points(&[[1.0, 2.0, 0.0]]);
        let polygon = renderer.project_mesh(&mesh, WINDOW).unwrap();
        assert_eq!(polygon.xs, vec![560]);
        assert_eq!(polygon.ys, vec![620]);
    }

    #[test]
    fn test_cross_terms_feed_projection() {
        let scale = Matrix::from_rows(&[[1.0, 0.0, 4.0], [0.0, 1.0, 0.0]]).unwrap();
        let renderer = Renderer::new(scale).unwrap();
        let mesh = Mesh::from_points(&[[0.0, 0.0, 0.0]]);
        let polygon = renderer.project_mesh(&mesh, WINDOW).unwrap();
        // 4.0 * camera_dist_z (0.75) = 3
        assert_eq!(polygon.xs, vec![403]);
        assert_eq!(polygon.ys, vec![300]);
    }

    #[test]
    fn test_projection_follows_camera() {
        let mut renderer = Renderer::with_scale(1.0, 1.0);
        renderer.camera_mut().set_x(1.0);
        let mesh = Mesh::from_points(&[[1.0, 0.0, 0.0]]);
        let polygon = renderer.project_mesh(&mesh, WINDOW).unwrap();
        assert_eq!(polygon.xs, vec![400]);
    }

    #[test]
    fn test_rounds_half_window() {
        let renderer = Renderer::default();
        let mesh = Mesh::from_points(&[[0.0, 0.0, 0.0]]);
        let polygon = renderer
            .project_mesh(&mesh, WindowSize::new(801, 601))
            .unwrap();
        assert_eq!(polygon.xs, vec![401]);
        assert_eq!(polygon.ys, vec![301]);
    }

    #[test]
    fn test_face_gate_leaves_all_vertices_at_origin() {
        let renderer = Renderer::default();
        // Summed centroid z = -80, face depth = 0.05 * -65 / 2 = -1.625.
        // The first vertex would pass on its own.
        let mesh = Mesh::from_points(&[[1.0, 1.0, 0.0], [2.0, 1.0, -40.0], [1.0, 2.0, -40.0]]);
        let polygon = renderer.project_mesh(&mesh, WINDOW).unwrap();
        assert_eq!(polygon.xs, vec![0, 0, 0]);
        assert_eq!(polygon.ys, vec![0, 0, 0]);

        let mut surface = RecordingSurface::new();
        renderer
            .render_mesh(&mesh, Color::WHITE, false, &mut surface, WINDOW)
            .unwrap();
        assert_eq!(surface.polygons.len(), 1);
        assert_eq!(surface.polygons[0].xs, vec![0, 0, 0]);
    }

    #[test]
    fn test_vertex_gate_only_zeroes_that_vertex() {
        let renderer = Renderer::default();
        // z = -15.5 gives depth 0.05 * -0.5 / 2 = -0.0125
        let mesh = Mesh::from_points(&[[0.0, 0.0, 0.0], [1.0, 1.0, -15.5], [1.0, 0.0, 0.0]]);
        let polygon = renderer.project_mesh(&mesh, WINDOW).unwrap();
        assert_eq!(polygon.xs, vec![400, 0, 560]);
        assert_eq!(polygon.ys, vec![300, 0, 300]);
    }

    #[test]
    fn test_filled_flag_selects_primitive() {
        let renderer = Renderer::default();
        let mesh = Mesh::from_points(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let mut surface = RecordingSurface::new();
        renderer
            .render_mesh(&mesh, Color::RED, true, &mut surface, WINDOW)
            .unwrap();
        renderer
            .render_mesh(&mesh, Color::BLUE, false, &mut surface, WINDOW)
            .unwrap();
        assert!(surface.polygons[0].filled);
        assert_eq!(surface.polygons[0].color, Color::RED);
        assert!(!surface.polygons[1].filled);
        assert_eq!(surface.polygons[1].color, Color::BLUE);
    }

    #[test]
    fn test_render_object_keeps_sequence_order() {
        let renderer = Renderer::default();
        let near = Mesh::from_points(&[[0.0, 0.0, -5.0], [1.0, 0.0, -5.0], [0.0, 1.0, -5.0]]);
        let far = Mesh::from_points(&[
            [0.0, 0.0, 5.0],
            [1.0, 0.0, 5.0],
            [1.0, 1.0, 5.0],
            [0.0, 1.0, 5.0],
        ]);
        let single = Mesh::from_points(&[[0.0, 0.0, 0.0]]);
        let object = Object::new(vec![far.clone(), near.clone(), single.clone()]);

        let mut surface = RecordingSurface::new();
        renderer
            .render_object(&object, Color::GREEN, false, &mut surface, WINDOW)
            .unwrap();

        let counts: Vec<usize> = surface.polygons.iter().map(|p| p.xs.len()).collect();
        assert_eq!(counts, vec![4, 3, 1]);
        for (recorded, mesh) in surface.polygons.iter().zip(object.meshes()) {
            let expected = renderer.project_mesh(mesh, WINDOW).unwrap();
            assert_eq!(recorded.xs, expected.xs);
            assert_eq!(recorded.ys, expected.ys);
        }
    }

    #[test]
    fn test_with_scale_builds_diagonal() {
        let renderer = Renderer::with_scale(2.0, 3.0);
        assert_eq!(
            renderer.scale_factor(),
            &Matrix::from_array([[2.0, 0.0, 0.0], [0.0, 3.0, 0.0]])
        );
        assert_eq!(
            Renderer::default().scale_factor(),
            &Matrix::from_array([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
        );
    }

    #[test]
    fn test_rejects_wrong_scale_shape() {
        let scale = Matrix::zeros(2, 2).unwrap();
        assert_eq!(
            Renderer::new(scale).unwrap_err(),
            Error::DimensionMismatch {
                left: (2, 2),
                right: (2, 3)
            }
        );
    }
}
