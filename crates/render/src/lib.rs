//! Rendering adapter: renderer-agnostic interface and camera.
//!
//! # Invariants
//! - Renderers read the scene; they never move entities.
//! - Camera motion is independent of the scene animation.

mod camera;
mod renderer;

pub use camera::FlyCamera;
pub use renderer::{DebugTextRenderer, Renderer};

/// Package name and version, for `orbit-cli info`.
pub fn crate_info() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        let info = crate_info();
        assert!(info.starts_with("orbit-render v"));
        assert!(info.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
