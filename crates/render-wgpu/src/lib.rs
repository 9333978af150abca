//! wgpu render backend for orbit scenes.
//!
//! Uploads scene meshes and materials once, then issues one indexed draw per
//! entity each frame using the entity's cached world matrix.
//!
//! # Invariants
//! - Rendering never mutates scene state; it only reads transform caches.
//! - GPU mesh and material lists are indexed by the scene's handles.
//! - Every material's shader program names entry points the lit shader defines.

mod gpu;
mod material;
mod mesh;
mod shaders;

pub use gpu::{RenderError, WgpuRenderer};
pub use shaders::{LIT_ENTRY_POINTS, MAX_LIGHTS};
