use std::fmt;

use flatworld_kernel::Canvas;
use glam::Vec2;

/// Fixed-size character grid. Positions are view-relative; anything that
/// falls outside the grid is clipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCanvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
    blank: char,
}

impl TextCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_blank(width, height, ' ')
    }

    pub fn with_blank(width: usize, height: usize, blank: char) -> Self {
        Self {
            width,
            height,
            cells: vec![blank; width * height],
            blank,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    pub fn clear(&mut self) {
        self.cells.fill(self.blank);
    }

    fn index(&self, at: Vec2) -> Option<usize> {
        let cell = at.floor();
        if cell.x < 0.0 || cell.y < 0.0 {
            return None;
        }
        let (x, y) = (cell.x as usize, cell.y as usize);
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }
}

impl Canvas for TextCanvas {
    fn put(&mut self, at: Vec2, glyph: char) {
        match self.index(at) {
            Some(i) => self.cells[i] = glyph,
            None => tracing::trace!(?at, %glyph, "glyph clipped"),
        }
    }
}

impl fmt::Display for TextCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: String = row.iter().collect();
            f.write_str(&line)?;
        }
        Ok(())
    }
}
