//! Renderable models attached to scene nodes

use crate::foundation::math::{Aabb, Colour, Vec3};

/// Indexed triangle mesh in the model's local space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    pub vertices: Vec<Vec3>,
    /// Triangle indices into `vertices`
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a mesh from positions and triangle indices
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Axis-aligned cube centered on the origin
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let vertices = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        let indices = vec![
            0, 2, 1, 0, 3, 2, // back
            4, 5, 6, 4, 6, 7, // front
            0, 1, 5, 0, 5, 4, // bottom
            3, 7, 6, 3, 6, 2, // top
            0, 4, 7, 0, 7, 3, // left
            1, 2, 6, 1, 6, 5, // right
        ];
        Self { vertices, indices }
    }

    /// Whether the mesh has anything to draw
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounds of all vertices, or a degenerate box at the origin
    pub fn bounds(&self) -> Aabb {
        let mut iter = self.vertices.iter();
        let Some(first) = iter.next() else {
            return Aabb::new(Vec3::zeros(), Vec3::zeros());
        };
        iter.fold(Aabb::new(*first, *first), |acc, v| Aabb::new(acc.min.inf(v), acc.max.sup(v)))
    }
}

/// A named mesh with a base colour and cached local bounds
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    mesh: Mesh,
    colour: Colour,
    bounds: Aabb,
}

impl Model {
    /// Create a model, computing its bounds from the mesh
    pub fn new(name: impl Into<String>, mesh: Mesh, colour: Colour) -> Self {
        let bounds = mesh.bounds();
        Self {
            name: name.into(),
            mesh,
            colour,
            bounds,
        }
    }

    /// Convenience cube model
    pub fn cube(name: impl Into<String>, size: f32, colour: Colour) -> Self {
        Self::new(name, Mesh::cube(size), colour)
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geometry
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Base colour
    pub fn colour(&self) -> Colour {
        self.colour
    }

    /// Change the base colour
    pub fn set_colour(&mut self, colour: Colour) {
        self.colour = colour;
    }

    /// Local-space bounds
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }
}
