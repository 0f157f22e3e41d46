use core::ops::Range;

use crate::{COLUMNS, ROWS};

/// Next write column of every line.
///
/// A cursor keeps counting past the last column, writes at such a column are dropped until the
/// line is broken or the display cleared.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Cursors([u8; ROWS as usize]);

impl Cursors {
    pub(crate) const fn new() -> Self {
        Self([0; ROWS as usize])
    }

    pub(crate) fn reset(&mut self) {
        self.0 = [0; ROWS as usize];
    }

    pub(crate) fn get(&self, line: u8) -> Option<u8> {
        self.0.get(line as usize).copied()
    }

    /// Column for the next character on `line`, advancing the cursor.
    pub(crate) fn advance(&mut self, line: u8) -> Option<u8> {
        let cursor = self.0.get_mut(line as usize)?;
        let col = *cursor;
        *cursor = cursor.saturating_add(1);
        Some(col)
    }

    /// Columns to blank for a line break on `line`. Moves the cursor back to 0.
    pub(crate) fn line_break(&mut self, line: u8) -> Option<Range<u8>> {
        let cursor = self.0.get_mut(line as usize)?;
        let rest = *cursor..COLUMNS;
        *cursor = 0;
        Some(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_advance_independently() {
        let mut cursors = Cursors::new();
        assert_eq!(cursors.advance(0), Some(0));
        assert_eq!(cursors.advance(0), Some(1));
        assert_eq!(cursors.advance(1), Some(0));
        assert_eq!(cursors.get(0), Some(2));
        assert_eq!(cursors.get(1), Some(1));
    }

    #[test]
    fn invalid_line() {
        let mut cursors = Cursors::new();
        assert_eq!(cursors.advance(2), None);
        assert_eq!(cursors.line_break(2), None);
        assert_eq!(cursors.get(2), None);
        assert_eq!(cursors, Cursors::new());
    }

    #[test]
    fn line_break_blanks_rest_of_line() {
        let mut cursors = Cursors::new();
        for _ in 0..5 {
            cursors.advance(1);
        }
        assert_eq!(cursors.line_break(1), Some(5..16));
        assert_eq!(cursors.get(1), Some(0));
    }

    #[test]
    fn overflowed_line_has_nothing_to_blank() {
        let mut cursors = Cursors::new();
        for _ in 0..20 {
            cursors.advance(0);
        }
        assert_eq!(cursors.get(0), Some(20));
        assert_eq!(cursors.line_break(0).map(|r| r.count()), Some(0));
        assert_eq!(cursors.get(0), Some(0));
    }

    #[test]
    fn cursor_saturates() {
        let mut cursors = Cursors::new();
        for _ in 0..300 {
            cursors.advance(0);
        }
        assert_eq!(cursors.get(0), Some(u8::MAX));
    }

    #[test]
    fn reset() {
        let mut cursors = Cursors::new();
        cursors.advance(0);
        cursors.advance(1);
        cursors.reset();
        assert_eq!(cursors, Cursors::new());
    }
}
