//! Rendering Adapter: draw targets for the world manager's draw passes.
//!
//! # Invariants
//! - Renderers only reach entities through `WorldManager::draw` and
//!   `WorldManager::draw_overlay`; they never move or delete anything.
//! - Render output derives from world state and the current view.

mod canvas;
mod renderer;

pub use canvas::TextCanvas;
pub use renderer::{Renderer, TextRenderer};

pub fn crate_info() -> &'static str {
    "flatworld-render v0.1.0"
}
