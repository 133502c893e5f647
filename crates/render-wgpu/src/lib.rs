//! wgpu render backend for the sweet cart scene viewer.
//!
//! Renders the fixed tableau of textured primitives plus a flat-colored
//! light marker. Camera uses a fly-camera model with WASD + mouse look.
//!
//! # Invariants
//! - The renderer never mutates scene data; the tableau is constant and the
//!   per-object model matrices are written once at construction.
//! - Shader validation failures are startup errors, never runtime ones.

mod camera;
mod gpu;
mod primitives;
mod texture;

pub use camera::{FlyCamera, MoveDirection};
pub use gpu::{RenderError, SceneRenderer};
pub use primitives::{MeshData, Vertex, build_mesh};
