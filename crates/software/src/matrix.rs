//! Turns the electrical state of a key matrix into MIDI.
//!
//! A [`Scanner`] selects the rows of a [`ScanMatrix`] one at a time, samples every column of the selected row,
//! and compares each sample against the key's remembered state. A key that goes from released to pressed sends
//! a Note On; one that goes from pressed to released sends a Note Off. Keys whose level didn't change send nothing,
//! so holding a key across any number of sweeps yields exactly one Note On and, eventually, one Note Off.

mod event;
pub use event::*;

mod key_state;
use key_state::KeyState;

mod pins;
pub use pins::*;

use crate::configuration::{Debounce, NoteLayout};

/// Owns the key state table of a `ROWS` × `COLS` key matrix and detects key transitions.
///
/// The table is only ever written by [`scan_row`](Self::scan_row), right after the key's column was sampled.
#[derive(Clone, Debug, PartialEq)]
pub struct Scanner<const ROWS: usize, const COLS: usize> {
    layout: NoteLayout<ROWS, COLS>,
    debounce: Debounce,
    keys: [[KeyState; COLS]; ROWS],
}

impl<const ROWS: usize, const COLS: usize> Scanner<ROWS, COLS> {
    /// Most messages a single [`sweep`](Self::sweep) can send: one per key, when every key changes at once.
    ///
    /// A transport that only drains its queue between sweeps needs at least this much room to never drop one.
    pub const MAX_MESSAGES_PER_SWEEP: usize = ROWS * COLS;

    /// Constructs a [`Scanner`] with every key released.
    pub fn new(layout: NoteLayout<ROWS, COLS>, debounce: Debounce) -> Self {
        Self {
            layout,
            debounce,
            keys: [[KeyState::default(); COLS]; ROWS],
        }
    }

    /// Scans a single row: selects it on `matrix`, samples each column once, and sends a message to `sink` for
    /// every key transition found. Returns true if any key of the row is physically pressed, whether or not it
    /// produced a message.
    ///
    /// # Panics
    ///
    /// Panics if `row` is not less than `ROWS`.
    pub fn scan_row<M, S>(&mut self, row: usize, matrix: &mut M, sink: &mut S) -> bool
    where
        M: ScanMatrix<ROWS, COLS> + ?Sized,
        S: MidiSink + ?Sized,
    {
        assert!(row < ROWS, "row {} is outside the matrix", row);
        matrix.select_row(row);

        let mut any_pressed = false;
        for column in 0..COLS {
            let pressed = matrix.is_column_asserted(column);
            any_pressed |= pressed;

            let key = &mut self.keys[row][column];
            if !key.accepts(pressed, self.debounce) {
                continue;
            }

            let note = self.layout.note(row, column);
            let event = if pressed {
                KeyEvent::Pressed(note)
            } else {
                KeyEvent::Released(note)
            };
            debug!("Key ({}, {}): {}", row, column, event);
            sink.send(event.to_bytes());
            key.commit(pressed);
        }
        any_pressed
    }

    /// Scans every row once, in increasing order. Returns true if any key of the matrix is physically pressed.
    ///
    /// Rows must all be scanned on every sweep; a row left out would miss the release of its keys.
    pub fn sweep<M, S>(&mut self, matrix: &mut M, sink: &mut S) -> bool
    where
        M: ScanMatrix<ROWS, COLS> + ?Sized,
        S: MidiSink + ?Sized,
    {
        let mut any_pressed = false;
        for row in 0..ROWS {
            any_pressed |= self.scan_row(row, matrix, sink);
        }
        any_pressed
    }

    /// Returns true if the key at `row`, `column` is held, as far as the scanner is concerned.
    pub fn is_held(&self, row: usize, column: usize) -> bool {
        self.keys
            .get(row)
            .and_then(|keys| keys.get(column))
            .is_some_and(KeyState::is_held)
    }

    /// Returns the [`Debounce`] setting.
    pub fn debounce(&self) -> Debounce {
        self.debounce
    }
}

impl<const ROWS: usize, const COLS: usize> Default for Scanner<ROWS, COLS> {
    fn default() -> Self {
        Self::new(NoteLayout::default(), Debounce::default())
    }
}
