/// Obsidian Core Library - matrix math and perspective projection
///
/// This library provides the projection pipeline of the toolkit: a checked
/// matrix type, the camera, mesh/object containers and the renderer that turns
/// them into screen-space polygons for any `DrawingSurface`.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod render_loop;
pub mod renderer;
pub mod stl;
pub mod surface;

// Re-export commonly used types
pub use camera::Camera;
pub use error::{Error, Result};
pub use geometry::{Mesh, Object};
pub use matrix::{multiply, Matrix};
pub use render_loop::{FpsCounter, RenderLoop};
pub use renderer::{Renderer, ScreenPolygon};
pub use surface::{Color, DrawingSurface, RecordingSurface, WindowSize};
