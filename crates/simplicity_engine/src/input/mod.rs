//! Input handling
//!
//! Currently limited to ray picking of scene nodes.

pub mod picking;

pub use picking::{PickHit, Picker, PickingContext};
