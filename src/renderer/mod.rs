//! WebGPU rendering module
//!
//! The scene is rebuilt every frame as a flat-colored triangle list in field
//! coordinates; the pipeline maps it to the canvas.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
