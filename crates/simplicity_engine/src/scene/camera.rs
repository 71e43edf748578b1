//! Scene camera
//!
//! A camera is attached to a node; its view matrix is the inverse of that
//! node's world transform. The projection can be switched between
//! perspective and orthographic without losing the other parameters.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Mat4, Mat4Ext, Point3, Ray, Vec4};
use crate::scene::{NodeKey, SceneError, SceneGraph, SceneResult};

/// Projection kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionMode {
    /// Perspective projection
    #[default]
    Perspective,
    /// Parallel projection
    Orthographic,
}

/// Projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Active projection kind
    pub mode: ProjectionMode,
    /// Vertical field of view in radians (perspective)
    pub fov_y: f32,
    /// Half of the visible height (orthographic)
    pub half_height: f32,
    /// Width / height
    pub aspect: f32,
    /// Near clipping distance
    pub near: f32,
    /// Far clipping distance
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::Perspective,
            fov_y: utils::deg_to_rad(60.0),
            half_height: 5.0,
            aspect: 4.0 / 3.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Projection {
    /// Projection matrix for the active mode
    pub fn matrix(&self) -> Mat4 {
        match self.mode {
            ProjectionMode::Perspective => {
                Mat4::perspective(self.fov_y, self.aspect, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                Mat4::orthographic(self.half_height, self.aspect, self.near, self.far)
            }
        }
    }
}

/// Camera looking down the -Z axis of its node
#[derive(Debug, Clone)]
pub struct Camera {
    node: NodeKey,
    /// Projection parameters
    pub projection: Projection,
    last_view: Mat4,
}

impl Camera {
    /// Bind a camera to a node
    pub fn new(node: NodeKey, projection: Projection) -> Self {
        Self {
            node,
            projection,
            last_view: Mat4::identity(),
        }
    }

    /// Node carrying the camera transform
    pub fn node(&self) -> NodeKey {
        self.node
    }

    /// Inverse of the camera node's world transform
    pub fn try_view_matrix(&self, graph: &SceneGraph) -> SceneResult<Mat4> {
        graph
            .world_transform(self.node)?
            .try_inverse()
            .ok_or(SceneError::NonInvertibleTransform(self.node))
    }

    /// Lenient view matrix.
    ///
    /// Falls back to the last good view matrix (identity before the first
    /// success) and logs a warning when the camera transform cannot be
    /// inverted.
    pub fn view_matrix(&mut self, graph: &SceneGraph) -> Mat4 {
        match self.try_view_matrix(graph) {
            Ok(view) => {
                self.last_view = view;
                view
            }
            Err(e) => {
                log::warn!("{e}; keeping previous camera view");
                self.last_view
            }
        }
    }

    /// Projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    /// World-space ray through a point in normalized device coordinates
    /// (`[-1, 1]` on both axes, +Y up). The direction is normalized, so hit
    /// distances along the ray are world units.
    pub fn pick_ray(&self, graph: &SceneGraph, ndc_x: f32, ndc_y: f32) -> SceneResult<Ray> {
        let view = self.try_view_matrix(graph)?;
        let inverse = (self.projection_matrix() * view)
            .try_inverse()
            .ok_or(SceneError::NonInvertibleTransform(self.node))?;

        let unproject = |z: f32| {
            let clip = inverse * Vec4::new(ndc_x, ndc_y, z, 1.0);
            Point3::from(clip.xyz() / clip.w)
        };
        let near = unproject(-1.0);
        let far = unproject(1.0);
        Ok(Ray::new(near, (far - near).normalize()))
    }
}
