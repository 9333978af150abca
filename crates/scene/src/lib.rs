//! Scene model: meshes and materials shared by handle, entities that own
//! their transforms, and the fixed demo scene.
//!
//! # Invariants
//! - Meshes and materials are immutable once added; handles never dangle.
//! - An entity always refers to a mesh and material present in its scene.
//! - Entity order is insertion order and is the draw order.

pub mod demo;
mod entity;
pub mod geometry;
mod light;
mod material;
mod mesh;
mod scene;
mod snapshot;

pub use demo::{CLEAR_COLOR, DemoEntities, DemoScene};
pub use entity::{Entity, MaterialHandle, MeshHandle};
pub use light::DirectionalLight;
pub use material::{Material, ShaderProgram, TextureData, TextureError};
pub use mesh::{Mesh, MeshError, Vertex};
pub use scene::{Scene, SceneError};
pub use snapshot::{EntitySnapshot, SceneSnapshot};
