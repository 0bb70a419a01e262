//! Per-query "already seen" stamps for linedefs.
//!
//! A line can sit in several blockmap cells or be shared by several segs.
//! Every independent query takes a fresh stamp with [`LineMarks::next_query`]
//! and calls [`LineMarks::mark`] before processing a line; a line is handled
//! at most once per stamp. The stamps live outside the immutable [`Level`]
//! so two queries can never share them by accident: each caller owns its
//! own `LineMarks`.
//!
//! [`Level`]: super::Level

use super::geometry::LinedefId;

#[derive(Clone, Debug)]
pub struct LineMarks {
    stamps: Vec<u32>,
    current: u32,
}

impl LineMarks {
    pub fn new(line_count: usize) -> Self {
        Self {
            stamps: vec![0; line_count],
            current: 0,
        }
    }

    /// Begin a new query.
    pub fn next_query(&mut self) {
        self.current = self.current.wrapping_add(1);
        if self.current == 0 {
            // wrapped: old stamps could collide with fresh ones
            self.stamps.fill(0);
            self.current = 1;
        }
    }

    /// Mark `line` as seen. Returns `false` if it was already seen during
    /// the current query.
    #[inline]
    pub fn mark(&mut self, line: LinedefId) -> bool {
        match self.stamps.get_mut(line as usize) {
            Some(s) if *s == self.current => false,
            Some(s) => {
                *s = self.current;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_line_once_per_query() {
        let mut m = LineMarks::new(3);
        m.next_query();
        assert!(m.mark(1));
        assert!(!m.mark(1));
        assert!(m.mark(2));

        m.next_query();
        assert!(m.mark(1));
        assert!(m.mark(2));
    }

    #[test]
    fn wrap_around_clears_old_stamps() {
        let mut m = LineMarks::new(2);
        m.next_query();
        assert!(m.mark(0));
        m.current = u32::MAX;
        m.stamps[1] = 1;
        m.next_query();
        assert_eq!(m.current, 1);
        assert!(m.mark(0));
        assert!(m.mark(1));
    }

    #[test]
    fn out_of_range_lines_are_ignored() {
        let mut m = LineMarks::new(1);
        m.next_query();
        assert!(!m.mark(9));
    }
}
