use crate::error::Result;

/// Height of a terminal cell relative to its width
pub const CELL_ASPECT: f32 = 2.0;

/// Highest pixel ratio the renderer supports (two pixels per cell)
pub const MAX_PIXEL_RATIO: u16 = 2;

/// Terminal surface dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub columns: u16,
    pub rows: u16,
    pub pixel_ratio: u16,
}

impl Viewport {
    pub fn new(columns: u16, rows: u16, requested_ratio: u16) -> Self {
        Viewport {
            columns: columns.max(1),
            rows: rows.max(1),
            pixel_ratio: clamp_pixel_ratio(requested_ratio),
        }
    }

    /// Queries the current terminal size
    pub fn detect(requested_ratio: u16) -> Result<Self> {
        let (columns, rows) = match termsize::get() {
            Some(size) => (size.cols, size.rows),
            None => crossterm::terminal::size()?,
        };
        Ok(Viewport::new(columns, rows, requested_ratio))
    }

    /// Applies a resize event, keeping the pixel ratio
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.columns = columns.max(1);
        self.rows = rows.max(1);
    }

    /// Framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (usize, usize) {
        (
            self.columns as usize,
            self.rows as usize * self.pixel_ratio as usize,
        )
    }

    /// Physical width over height of the surface
    pub fn aspect(&self) -> f32 {
        self.columns as f32 / (self.rows as f32 * CELL_ASPECT)
    }
}

pub fn clamp_pixel_ratio(requested: u16) -> u16 {
    requested.clamp(1, MAX_PIXEL_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped_at_two() {
        assert_eq!(Viewport::new(80, 24, 3).pixel_ratio, 2);
        assert_eq!(Viewport::new(80, 24, 0).pixel_ratio, 1);
    }

    #[test]
    fn framebuffer_doubles_rows_at_ratio_two() {
        let viewport = Viewport::new(80, 24, 2);
        assert_eq!(viewport.framebuffer_size(), (80, 48));
        assert_eq!(Viewport::new(80, 24, 1).framebuffer_size(), (80, 24));
    }

    #[test]
    fn resize_updates_aspect() {
        let mut viewport = Viewport::new(80, 20, 2);
        assert!((viewport.aspect() - 2.0).abs() < 1e-6);
        viewport.resize(120, 20);
        assert!((viewport.aspect() - 3.0).abs() < 1e-6);
        viewport.resize(0, 0);
        assert_eq!((viewport.columns, viewport.rows), (1, 1));
    }
}
