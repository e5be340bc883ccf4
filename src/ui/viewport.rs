//! Viewport management for scrolling.
//!
//! The [`Viewport`] tracks which slice of the buffer is on screen. The
//! session decides where the cursor goes; the viewport only follows it.

use std::ops::Range;

/// Manages the visible portion of the buffer.
///
/// # Example
///
/// ```
/// use embedit::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 24, 100);
/// assert_eq!(vp.visible_range(), 0..24);
///
/// vp.ensure_visible(30);
/// assert_eq!(vp.visible_range(), 7..31);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24, 0)
    }
}

impl Viewport {
    /// Create a new viewport.
    ///
    /// # Arguments
    ///
    /// * `width` - Terminal width in columns
    /// * `height` - Lines available to the text view
    /// * `total_lines` - Total lines in the buffer
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Lines currently on screen, clamped to the buffer.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset;
        let end = (self.offset + self.height as usize).min(self.total_lines);
        start..end
    }

    /// Scroll the minimum amount needed to bring `line` on screen.
    pub fn ensure_visible(&mut self, line: usize) {
        let line = line.min(self.total_lines.saturating_sub(1));
        if line < self.offset {
            self.offset = line;
        } else if self.height > 0 && line >= self.offset + self.height as usize {
            self.offset = line + 1 - self.height as usize;
        }
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the total number of lines (e.g. after an edit).
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_viewport_starts_at_top() {
        let vp = Viewport::new(80, 24, 100);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.visible_range(), 0..24);
    }

    #[test]
    fn test_ensure_visible_scrolls_down_minimally() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.ensure_visible(9);
        assert_eq!(vp.offset(), 0);
        vp.ensure_visible(10);
        assert_eq!(vp.offset(), 1);
    }

    #[test]
    fn test_ensure_visible_scrolls_up_to_line() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.ensure_visible(50);
        vp.ensure_visible(20);
        assert_eq!(vp.offset(), 20);
    }

    #[test]
    fn test_resize_keeps_valid_offset() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.ensure_visible(99);
        vp.resize(80, 60);
        assert_eq!(vp.offset(), 40);
    }

    #[test]
    fn test_set_total_lines_adjusts_offset() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.ensure_visible(99);
        vp.set_total_lines(50);
        assert_eq!(vp.offset(), 26);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ensured_line_is_visible(
                total_lines in 1..10000usize,
                height in 1..100u16,
                line in 0..10000usize,
            ) {
                let mut vp = Viewport::new(80, height, total_lines);
                vp.ensure_visible(line);
                let target = line.min(total_lines - 1);
                prop_assert!(vp.visible_range().contains(&target));
            }

            #[test]
            fn visible_range_within_bounds(
                total_lines in 0..10000usize,
                height in 1..100u16,
                line in 0..10000usize,
            ) {
                let mut vp = Viewport::new(80, height, total_lines);
                vp.ensure_visible(line);

                let range = vp.visible_range();
                prop_assert!(range.start <= range.end);
                prop_assert!(range.end <= total_lines);
            }
        }
    }
}
