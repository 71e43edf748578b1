//! # Core Engine Module
//!
//! Shared configuration used across the scene, render and input layers.

pub mod config;

pub use config::{ApplicationConfig, Config, ConfigError, EngineConfig, PickingConfig, RenderConfig};
