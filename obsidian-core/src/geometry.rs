/// Mesh and object primitives for 3D rendering
use crate::error::{Error, Result};
use crate::matrix::Matrix;

fn check_vertex(vertex: &Matrix) -> Result<()> {
    if vertex.shape() != (3, 1) {
        return Err(Error::DimensionMismatch {
            left: vertex.shape(),
            right: (3, 1),
        });
    }
    Ok(())
}

/// One flat polygon face: 3×1 vertex columns in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Matrix>,
}

impl Mesh {
    /// Create a mesh from 3×1 column matrices.
    pub fn new(vertices: Vec<Matrix>) -> Result<Self> {
        for vertex in &vertices {
            check_vertex(vertex)?;
        }
        Ok(Self { vertices })
    }

    pub fn from_points(points: &[[f64; 3]]) -> Self {
        Self {
            vertices: points
                .iter()
                .map(|&[x, y, z]| Matrix::point(x, y, z))
                .collect(),
        }
    }

    pub fn vertices(&self) -> &[Matrix] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Replace the vertex at `index`. The mesh is unchanged on error.
    pub fn set_matrix(&mut self, index: usize, vertex: Matrix) -> Result<()> {
        let len = self.vertices.len();
        let slot = self
            .vertices
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        check_vertex(&vertex)?;
        *slot = vertex;
        Ok(())
    }

    /// Per-axis sum of the vertex coordinates as a 3×1 matrix.
    ///
    /// Not divided by the vertex count: the visibility gate compares this
    /// value against a fixed threshold, so its scale is part of the
    /// rendering behavior.
    pub fn centroid(&self) -> Matrix {
        let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
        for vertex in &self.vertices {
            x += vertex[(0, 0)];
            y += vertex[(1, 0)];
            z += vertex[(2, 0)];
        }
        Matrix::point(x, y, z)
    }
}

/// A renderable body made of meshes, drawn in sequence order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    meshes: Vec<Mesh>,
}

impl Object {
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self { meshes }
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Replace the mesh at `index`. The object is unchanged on error.
    pub fn set_mesh(&mut self, index: usize, mesh: Mesh) -> Result<()> {
        let len = self.meshes.len();
        let slot = self
            .meshes
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = mesh;
        Ok(())
    }

    /// Six quad faces of an axis-aligned cube centered on the origin
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let faces = [
            // Front
            [[-h, -h, -h], [h, -h, -h], [h, h, -h], [-h, h, -h]],
            // Back
            [[-h, -h, h], [-h, h, h], [h, h, h], [h, -h, h]],
            // Top
            [[-h, h, -h], [h, h, -h], [h, h, h], [-h, h, h]],
            // Bottom
            [[-h, -h, -h], [-h, -h, h], [h, -h, h], [h, -h, -h]],
            // Right
            [[h, -h, -h], [h, -h, h], [h, h, h], [h, h, -h]],
            // Left
            [[-h, -h, -h], [-h, h, -h], [-h, h, h], [-h, -h, h]],
        ];

        Self::new(faces.iter().map(|face| Mesh::from_points(face)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(z: f64) -> Mesh {
        Mesh::from_points(&[[0.0, 0.0, z], [1.0, 0.0, z], [0.0, 1.0, z]])
    }

    #[test]
    fn test_single_vertex_centroid_is_vertex() {
        let mesh = Mesh::from_points(&[[1.5, -2.0, 3.25]]);
        assert_eq!(mesh.centroid(), Matrix::point(1.5, -2.0, 3.25));
    }

    #[test]
    fn test_centroid_is_unnormalized_sum() {
        let mesh = Mesh::from_points(&[[1.0, 2.0, 3.0], [3.0, 2.0, 1.0], [2.0, 2.0, 2.0]]);
        assert_eq!(mesh.centroid(), Matrix::point(6.0, 6.0, 6.0));
    }

    #[test]
    fn test_mesh_rejects_non_column_vertex() {
        let bad = Matrix::zeros(1, 3).unwrap();
        assert_eq!(
            Mesh::new(vec![Matrix::point(0.0, 0.0, 0.0), bad]),
            Err(Error::DimensionMismatch {
                left: (1, 3),
                right: (3, 1)
            })
        );
    }

    #[test]
    fn test_set_matrix() {
        let mut mesh = triangle(0.0);
        mesh.set_matrix(1, Matrix::point(9.0, 9.0, 9.0)).unwrap();
        assert_eq!(mesh.vertices()[1], Matrix::point(9.0, 9.0, 9.0));

        let before = mesh.clone();
        assert_eq!(
            mesh.set_matrix(3, Matrix::point(0.0, 0.0, 0.0)),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(mesh
            .set_matrix(0, Matrix::zeros(2, 1).unwrap())
            .is_err());
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_set_mesh_out_of_range_leaves_object() {
        let mut object = Object::new(vec![triangle(0.0), triangle(1.0)]);
        let before = object.clone();
        assert_eq!(
            object.set_mesh(2, triangle(5.0)),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(object, before);

        object.set_mesh(0, triangle(5.0)).unwrap();
        assert_eq!(object.meshes()[0], triangle(5.0));
        assert_eq!(object.meshes()[1], before.meshes()[1]);
        assert_eq!(object.len(), 2);
    }

    #[test]
    fn test_cube_faces() {
        let cube = Object::cube(2.0);
        assert_eq!(cube.len(), 6);
        for face in cube.meshes() {
            assert_eq!(face.len(), 4);
            for vertex in face.vertices() {
                for axis in 0..3 {
                    assert_eq!(vertex[(axis, 0)].abs(), 1.0);
                }
            }
        }
    }
}
