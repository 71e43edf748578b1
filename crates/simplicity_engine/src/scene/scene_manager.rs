//! Active scene context
//!
//! [`SceneManager`] bundles the graph with everything needed to show and
//! interact with it: the camera, the current selection, the frame renderer
//! and the picker. It is an ordinary value handed to whoever needs the
//! active scene; there is no global.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::core::config::ApplicationConfig;
use crate::input::Picker;
use crate::render::{DrawingMode, FrameStats, GraphicsContext, RenderError, SceneRenderer};
use crate::scene::{Camera, NodeId, NodeKey, ProjectionMode, SceneError, SceneGraph};

/// How a pick or explicit selection combines with the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Replace current selection (default)
    #[default]
    Replace,
    /// Add to current selection
    Add,
    /// Remove from current selection
    Remove,
}

/// Errors from operations spanning several subsystems
#[derive(Error, Debug)]
pub enum EngineError {
    /// Scene graph or camera error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Rendering error
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Persistable view settings.
///
/// The selection is stored by [`NodeId`] and re-resolved against the graph
/// on restore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    /// IDs of the selected nodes, ascending
    pub selection: Vec<NodeId>,
    /// Drawing mode
    pub drawing_mode: DrawingMode,
    /// Camera projection kind
    pub projection_mode: ProjectionMode,
}

impl Config for ViewState {}

/// The active scene together with its camera, selection and renderers
#[derive(Debug)]
pub struct SceneManager {
    graph: SceneGraph,
    camera: Camera,
    selection: HashSet<NodeKey>,
    renderer: SceneRenderer,
    picker: Picker,
}

impl SceneManager {
    /// Create a manager viewing `graph` through `camera`
    pub fn new(graph: SceneGraph, camera: Camera, config: &ApplicationConfig) -> Self {
        Self {
            graph,
            camera,
            selection: HashSet::new(),
            renderer: SceneRenderer::from_config(&config.render),
            picker: Picker::new(config.picking.clone()),
        }
    }

    /// The scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The scene graph, for editing
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Active camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Active camera, for editing
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Currently selected nodes
    pub fn selection(&self) -> &HashSet<NodeKey> {
        &self.selection
    }

    /// Whether `key` is selected
    pub fn is_selected(&self, key: NodeKey) -> bool {
        self.selection.contains(&key)
    }

    /// Combine `key` with the selection according to `mode`.
    ///
    /// Nodes that are not in the graph cannot be selected.
    pub fn select(&mut self, key: NodeKey, mode: SelectionMode) -> Result<(), SceneError> {
        if mode != SelectionMode::Remove && !self.graph.is_attached(key) {
            return Err(SceneError::NodeNotInGraph(key));
        }

        match mode {
            SelectionMode::Replace => {
                self.selection.clear();
                self.selection.insert(key);
            }
            SelectionMode::Add => {
                self.selection.insert(key);
            }
            SelectionMode::Remove => {
                self.selection.remove(&key);
            }
        }
        log::debug!("selection {mode:?} {key:?}: {} selected", self.selection.len());
        Ok(())
    }

    /// Empty the selection
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Drawing mode used for frames
    pub fn drawing_mode(&self) -> DrawingMode {
        self.renderer.drawing_mode()
    }

    /// Change the drawing mode
    pub fn set_drawing_mode(&mut self, mode: DrawingMode) {
        self.renderer.set_drawing_mode(mode);
    }

    /// Camera projection kind
    pub fn projection_mode(&self) -> ProjectionMode {
        self.camera.projection.mode
    }

    /// Switch between perspective and orthographic projection
    pub fn set_projection_mode(&mut self, mode: ProjectionMode) {
        self.camera.projection.mode = mode;
    }

    /// Drop selected nodes that have since been detached from the scene
    fn prune_selection(&mut self) {
        let graph = &self.graph;
        let before = self.selection.len();
        self.selection.retain(|&key| graph.is_attached(key));
        if self.selection.len() != before {
            let dropped = before - self.selection.len();
            log::debug!("dropped {dropped} detached nodes from the selection");
        }
    }

    /// Render the scene from the active camera
    pub fn render_frame(
        &mut self,
        ctx: &mut dyn GraphicsContext,
    ) -> Result<FrameStats, RenderError> {
        self.prune_selection();
        let view = self.camera.view_matrix(&self.graph);
        let projection = self.camera.projection_matrix();
        self.renderer.render(&self.graph, &view, &projection, &self.selection, ctx)
    }

    /// Pick the node under a viewport point in normalized device
    /// coordinates and apply it to the selection.
    ///
    /// A miss clears the selection in [`SelectionMode::Replace`] and leaves
    /// it alone otherwise.
    pub fn pick(
        &mut self,
        ndc_x: f32,
        ndc_y: f32,
        mode: SelectionMode,
    ) -> Result<Option<NodeKey>, EngineError> {
        self.prune_selection();
        let ray = self.camera.pick_ray(&self.graph, ndc_x, ndc_y)?;
        let hit = self.picker.pick(&self.graph, ray)?;

        match hit {
            Some(key) => self.select(key, mode)?,
            None if mode == SelectionMode::Replace => self.clear_selection(),
            None => {}
        }
        Ok(hit)
    }

    /// Snapshot of the persistable view settings.
    ///
    /// Selected nodes that are no longer attached to the scene are left out.
    pub fn view_state(&self) -> ViewState {
        let mut selection: Vec<NodeId> = self
            .selection
            .iter()
            .filter(|&&key| self.graph.is_attached(key))
            .filter_map(|&key| self.graph.node(key).and_then(|node| node.id()))
            .collect();
        selection.sort_unstable();

        ViewState {
            selection,
            drawing_mode: self.drawing_mode(),
            projection_mode: self.projection_mode(),
        }
    }

    /// Apply saved view settings.
    ///
    /// Returns the number of selected IDs that could not be resolved to a
    /// node in the graph; those are skipped.
    pub fn restore_view_state(&mut self, state: &ViewState) -> usize {
        self.set_drawing_mode(state.drawing_mode);
        self.set_projection_mode(state.projection_mode);

        self.selection.clear();
        let mut missing = 0;
        for &id in &state.selection {
            match self.graph.get_node(id).filter(|&key| self.graph.is_attached(key)) {
                Some(key) => {
                    self.selection.insert(key);
                }
                None => {
                    log::warn!("selected node {id} is no longer in the scene");
                    missing += 1;
                }
            }
        }
        missing
    }
}
