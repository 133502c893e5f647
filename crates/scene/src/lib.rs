//! Declarative scene data for the sweet cart tableau.
//!
//! Everything here is constant for the life of the process: the object
//! table, the geometry parameters behind each mesh, the texture manifest,
//! the light, and the window configuration. The renderer iterates this data;
//! it never owns scene layout of its own.

pub mod objects;
pub mod projection;

pub use objects::{LIGHT, Light, MeshId, Primitive, SceneObject, TABLEAU, TextureId};
pub use projection::Projection;

/// Fixed window title.
pub const WINDOW_TITLE: &str = "Sweet Cart";

/// Fixed startup window size.
pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;

/// Sky-blue background, linear RGBA.
pub const CLEAR_COLOR: [f64; 4] = [0.529, 0.808, 0.922, 1.0];
