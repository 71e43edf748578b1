//! # Application Configuration
//!
//! Settings for the engine core, the renderer chain and picking, gathered
//! under one [`ApplicationConfig`] that can be stored as TOML or RON.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Colour;
use crate::render::{DrawingMode, OutlineStyle, PolygonMode};

pub use crate::config::{Config, ConfigError};

/// # Engine Configuration
///
/// Core behaviour: logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Render Configuration
///
/// Outline appearance and the default drawing mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Stencil value stamped by the fill pass; must be non-zero
    pub stencil_reference: u8,
    /// Drawing mode for new scenes
    pub drawing_mode: DrawingMode,
    /// Silhouette colour
    pub outline_colour: Colour,
    /// Silhouette rasterization
    pub outline_style: OutlineStyle,
}

impl RenderConfig {
    /// Create a new render configuration
    pub fn new() -> Self {
        Self {
            stencil_reference: 1,
            drawing_mode: DrawingMode::Solid,
            outline_colour: Colour::SELECTION,
            outline_style: OutlineStyle::default(),
        }
    }

    /// Set the outline colour
    pub fn with_outline_colour(mut self, colour: Colour) -> Self {
        self.outline_colour = colour;
        self
    }

    /// Set the outline style
    pub fn with_outline_style(mut self, style: OutlineStyle) -> Self {
        self.outline_style = style;
        self
    }

    /// Set the stencil reference value
    pub fn with_stencil_reference(mut self, reference: u8) -> Self {
        self.stencil_reference = reference;
        self
    }

    /// Set the drawing mode
    pub fn with_drawing_mode(mut self, mode: DrawingMode) -> Self {
        self.drawing_mode = mode;
        self
    }

    /// Validate the render settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stencil_reference == 0 {
            return Err(ConfigError::Invalid(
                "Stencil reference must be non-zero; zero is the cleared value".to_string(),
            ));
        }

        if self.outline_style.mode == PolygonMode::Fill {
            return Err(ConfigError::Invalid("Outline style must be Line or Point".to_string()));
        }

        if !(self.outline_style.width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "Outline width must be positive, got {}",
                self.outline_style.width
            )));
        }

        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Picking Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingConfig {
    /// Capacity of the hit buffer
    pub max_hits: usize,
}

impl PickingConfig {
    /// Create a new picking configuration
    pub fn new() -> Self {
        Self { max_hits: 64 }
    }

    /// Set the hit buffer capacity
    pub fn with_max_hits(mut self, max_hits: usize) -> Self {
        self.max_hits = max_hits;
        self
    }
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Renderer chain configuration
    pub render: RenderConfig,
    /// Picking configuration
    pub picking: PickingConfig,
}

impl ApplicationConfig {
    /// Create a new application configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the engine section
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Replace the render section
    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    /// Replace the picking section
    pub fn with_picking(mut self, picking: PickingConfig) -> Self {
        self.picking = picking;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.render.validate()?;

        if self.picking.max_hits == 0 {
            return Err(ConfigError::Invalid(
                "Pick buffer needs room for at least one hit".to_string(),
            ));
        }

        Ok(())
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ApplicationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_stencil_reference_is_rejected() {
        let config =
            ApplicationConfig::new().with_render(RenderConfig::new().with_stencil_reference(0));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_fill_outline_is_rejected() {
        let style = OutlineStyle { mode: PolygonMode::Fill, width: 3.0 };
        let config =
            ApplicationConfig::new().with_render(RenderConfig::new().with_outline_style(style));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ApplicationConfig::new()
            .with_engine(EngineConfig::new().with_log_level("debug"))
            .with_render(RenderConfig::new().with_drawing_mode(DrawingMode::Wireframe))
            .with_picking(PickingConfig::new().with_max_hits(8));

        let text = config.to_toml_string().unwrap();
        assert_eq!(ApplicationConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = ApplicationConfig::from_toml_str("[picking]\nmax_hits = 4\n").unwrap();
        assert_eq!(config.picking.max_hits, 4);
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn test_ron_file_round_trip() {
        let file = tempfile::Builder::new().suffix(".ron").tempfile().unwrap();
        let config = ApplicationConfig::new()
            .with_render(RenderConfig::new().with_outline_colour(Colour::rgb(0.0, 1.0, 0.0)));

        config.save_to_file(file.path()).unwrap();
        assert_eq!(ApplicationConfig::load_from_file(file.path()).unwrap(), config);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = ApplicationConfig::default().save_to_file("settings.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
