//! Scroll window over the filtered rows.

/// First visible row, kept within `0..=total - viewport`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    offset: usize,
    viewport: usize,
    total: usize,
}

impl ScrollState {
    pub fn offset(self) -> usize {
        self.offset
    }

    fn max_offset(self) -> usize {
        self.total.saturating_sub(self.viewport)
    }

    /// Record the current row count and window height, then clamp.
    pub fn set_bounds(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let moved = if delta.is_negative() {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta.unsigned_abs())
        };
        self.offset = moved.min(self.max_offset());
    }

    pub fn page(&mut self, down: bool) {
        let step = isize::try_from(self.viewport.max(1)).unwrap_or(isize::MAX);
        self.scroll_by(if down { step } else { -step });
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    pub fn has_above(self) -> bool {
        self.offset > 0
    }

    pub fn has_below(self) -> bool {
        self.offset + self.viewport < self.total
    }

    /// Index range of the rows inside the window.
    pub fn window(self) -> std::ops::Range<usize> {
        let end = (self.offset + self.viewport).min(self.total);
        self.offset.min(end)..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state(total: usize, viewport: usize) -> ScrollState {
        let mut s = ScrollState::default();
        s.set_bounds(total, viewport);
        s
    }

    #[test]
    fn offset_stays_within_bounds() {
        let mut s = state(50, 20);
        for _ in 0..100 {
            s.scroll_by(1);
            assert!(s.offset() <= 30);
        }
        assert_eq!(s.offset(), 30);
        assert!(!s.has_below());
        assert!(s.has_above());

        for _ in 0..100 {
            s.scroll_by(-1);
        }
        assert_eq!(s.offset(), 0);
        assert!(!s.has_above());
        assert!(s.has_below());
    }

    #[test]
    fn large_jumps_clamp() {
        let mut s = state(50, 20);
        s.scroll_by(isize::MAX);
        assert_eq!(s.offset(), 30);
        s.scroll_by(isize::MIN);
        assert_eq!(s.offset(), 0);
    }

    #[test]
    fn shrinking_rows_pulls_offset_back() {
        let mut s = state(50, 20);
        s.scroll_by(25);
        s.set_bounds(30, 20);
        assert_eq!(s.offset(), 10);
        s.set_bounds(5, 20);
        assert_eq!(s.offset(), 0);
        assert_eq!(s.window(), 0..5);
    }

    #[test]
    fn paging_moves_a_viewport() {
        let mut s = state(50, 20);
        s.page(true);
        assert_eq!(s.offset(), 20);
        assert_eq!(s.window(), 20..40);
        s.page(true);
        assert_eq!(s.offset(), 30);
        s.page(false);
        assert_eq!(s.offset(), 10);
    }
}
