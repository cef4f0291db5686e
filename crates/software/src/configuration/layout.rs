use wmidi::{Note, U7};

/// Note assigned to the key at row 0, column 0 unless a layout says otherwise (MIDI note 36).
pub const DEFAULT_BASE_NOTE: Note = Note::C2;

/// Maps a position in a `ROWS` × `COLS` key matrix to a [`Note`].
///
/// Keys are numbered row by row, so the note of a key is `base + row * COLS + column`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteLayout<const ROWS: usize, const COLS: usize> {
    base: Note,
}

impl<const ROWS: usize, const COLS: usize> NoteLayout<ROWS, COLS> {
    /// Constructs a [`NoteLayout`] whose lowest key plays `base`.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is empty or if its highest key would land above MIDI note 127. Declare layouts as
    /// constants so that either mistake fails compilation instead:
    ///
    /// ```
    /// use midi_keyboard_lib::configuration::{DEFAULT_BASE_NOTE, NoteLayout};
    ///
    /// const LAYOUT: NoteLayout<11, 6> = NoteLayout::new(DEFAULT_BASE_NOTE);
    /// assert_eq!(101, LAYOUT.note(10, 5) as u8);
    /// ```
    pub const fn new(base: Note) -> Self {
        assert!(
            ROWS > 0 && COLS > 0,
            "a key matrix needs at least one row and one column"
        );
        assert!(
            base as usize + ROWS * COLS - 1 <= 127,
            "the highest key of the layout must not exceed MIDI note 127"
        );
        Self { base }
    }

    /// Returns the [`Note`] played by the key at `row`, `column`.
    ///
    /// Both coordinates must lie within the matrix.
    pub fn note(&self, row: usize, column: usize) -> Note {
        debug_assert!(row < ROWS && column < COLS);
        let offset = (row * COLS + column) as u8;
        // in range as long as the position is; see the assertions in `new`
        Note::from(U7::from_u8_lossy(self.base as u8 + offset))
    }

    /// Returns the highest [`Note`] of the layout, i.e. the note of the last key of the last row.
    pub fn highest(&self) -> Note {
        self.note(ROWS - 1, COLS - 1)
    }
}

impl<const ROWS: usize, const COLS: usize> Default for NoteLayout<ROWS, COLS> {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_NOTE)
    }
}

#[cfg(feature = "defmt")]
impl<const ROWS: usize, const COLS: usize> defmt::Format for NoteLayout<ROWS, COLS> {
    fn format(&self, fmt: defmt::Formatter) {
        let (lowest, highest) = (self.base.to_str(), self.highest().to_str());
        defmt::write!(fmt, "{}x{} keys, {}..={}", ROWS, COLS, lowest, highest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_key_plays_base_note() {
        let layout = NoteLayout::<11, 6>::default();
        assert_eq!(Note::C2, layout.note(0, 0), "Expected left but got right");
        assert_eq!(36, layout.note(0, 0) as u8, "Expected left but got right");
    }

    #[test]
    fn notes_advance_along_rows() {
        let layout = NoteLayout::<2, 2>::default();
        assert_eq!(37, layout.note(0, 1) as u8, "Expected left but got right");
        assert_eq!(38, layout.note(1, 0) as u8, "Expected left but got right");
        assert_eq!(39, layout.note(1, 1) as u8, "Expected left but got right");
    }

    #[test]
    fn every_key_has_a_distinct_note_within_range() {
        const ROWS: usize = 11;
        const COLS: usize = 6;
        let layout = NoteLayout::<ROWS, COLS>::default();

        let range = 36..36 + (ROWS * COLS) as u8;
        let mut seen = [false; 128];
        for row in 0..ROWS {
            for column in 0..COLS {
                let note = layout.note(row, column) as u8;
                assert!(range.contains(&note), "Note {} is out of range", note);
                assert!(!seen[note as usize], "Note {} is assigned twice", note);
                seen[note as usize] = true;
            }
        }
        assert_eq!(
            ROWS * COLS,
            seen.iter().filter(|&&s| s).count(),
            "Expected left but got right"
        );
    }

    #[test]
    fn highest() {
        let layout = NoteLayout::<11, 6>::default();
        assert_eq!(101, layout.highest() as u8, "Expected left but got right");
    }

    #[test]
    fn layout_may_end_on_note_127() {
        let layout = NoteLayout::<2, 4>::new(Note::from(U7::from_u8_lossy(120)));
        assert_eq!(127, layout.highest() as u8, "Expected left but got right");
    }

    #[test]
    #[should_panic]
    fn layout_past_note_127_is_rejected() {
        let _ = NoteLayout::<2, 4>::new(Note::from(U7::from_u8_lossy(121)));
    }
}
