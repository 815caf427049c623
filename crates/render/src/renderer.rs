use flatworld_kernel::WorldManager;

use crate::canvas::TextCanvas;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer runs the world's draw passes against its own target and
/// produces output. Drawing needs `&mut` because entities may update
/// animation state while drawing.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame: the world layers, then the overlay on top.
    fn render(&mut self, world: &mut WorldManager) -> Self::Output;
}

/// Draws the current view into a [`TextCanvas`] sized to the view.
#[derive(Debug)]
pub struct TextRenderer {
    blank: char,
    header: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            blank: '.',
            header: true,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Character used for empty cells.
    pub fn with_blank(mut self, blank: char) -> Self {
        self.blank = blank;
        self
    }

    /// Omit the status line above the grid.
    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&mut self, world: &mut WorldManager) -> String {
        let view = world.view();
        let width = view.width().max(0.0).ceil() as usize;
        let height = view.height().max(0.0).ceil() as usize;
        let mut canvas = TextCanvas::with_blank(width, height, self.blank);

        let drawn = world.draw(&mut canvas);
        let overlay = world.draw_overlay(&mut canvas);
        tracing::trace!(drawn, overlay, "frame rendered");

        let mut out = String::new();
        if self.header {
            let step = world
                .last_step()
                .map_or_else(|| String::from("-"), |s| s.to_string());
            out.push_str(&format!(
                "=== step={} entities={} view=({:.1}, {:.1}) drawn={} ===\n",
                step,
                world.entity_count(),
                view.corner.x,
                view.corner.y,
                drawn + overlay
            ));
        }
        out.push_str(&canvas.to_string());
        out
    }
}
