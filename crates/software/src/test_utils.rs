//! Simulated hardware shared by the unit tests.

use crate::{
    configuration::Polarity,
    matrix::{MidiSink, PinMatrix},
};
use core::{cell::Cell, convert::Infallible};
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};
use tinyvec::ArrayVec;

pub type BoardMatrix<'a, const ROWS: usize, const COLS: usize> = PinMatrix<
    RowPin<'a, ROWS, COLS>,
    ColumnPin<'a, ROWS, COLS>,
    SettleDelay<'a, ROWS, COLS>,
    ROWS,
    COLS,
>;

/// A key matrix without diodes: a column reads active only through a pressed key of an active row.
///
/// Besides the line levels, the board keeps count of column reads that would have been unreliable, either because
/// the number of active rows was not exactly one or because no settle delay followed the last row write.
pub struct Board<const ROWS: usize, const COLS: usize> {
    polarity: Polarity,
    /// true means the line is high
    rows: [Cell<bool>; ROWS],
    keys: [[Cell<bool>; COLS]; ROWS],
    settled: Cell<bool>,
    settled_ns: Cell<u64>,
    crosstalk_reads: Cell<usize>,
    unsettled_reads: Cell<usize>,
    reads: Cell<usize>,
}

impl<const ROWS: usize, const COLS: usize> Board<ROWS, COLS> {
    pub fn new(polarity: Polarity) -> Self {
        let idle = polarity.inactive() == embedded_hal::digital::PinState::High;
        Self {
            polarity,
            rows: core::array::from_fn(|_| Cell::new(idle)),
            keys: core::array::from_fn(|_| core::array::from_fn(|_| Cell::new(false))),
            settled: Cell::new(false),
            settled_ns: Cell::new(0),
            crosstalk_reads: Cell::new(0),
            unsettled_reads: Cell::new(0),
            reads: Cell::new(0),
        }
    }

    pub fn pin_matrix(&self) -> BoardMatrix<'_, ROWS, COLS> {
        PinMatrix::new(
            core::array::from_fn(|index| RowPin { board: self, index }),
            core::array::from_fn(|index| ColumnPin { board: self, index }),
            SettleDelay { board: self },
            self.polarity,
        )
    }

    pub fn press(&self, row: usize, column: usize) {
        self.keys[row][column].set(true);
    }

    pub fn release(&self, row: usize, column: usize) {
        self.keys[row][column].set(false);
    }

    pub fn row_levels(&self) -> [bool; ROWS] {
        core::array::from_fn(|row| self.rows[row].get())
    }

    pub fn settled_ns(&self) -> u64 {
        self.settled_ns.get()
    }

    pub fn crosstalk_reads(&self) -> usize {
        self.crosstalk_reads.get()
    }

    pub fn unsettled_reads(&self) -> usize {
        self.unsettled_reads.get()
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    fn is_row_active(&self, row: usize) -> bool {
        self.polarity.is_asserted(self.rows[row].get())
    }

    fn is_closed(&self, row: usize, column: usize) -> bool {
        self.is_row_active(row) && self.keys[row][column].get()
    }

    fn read_column(&self, column: usize) -> bool {
        self.reads.set(self.reads.get() + 1);
        if (0..ROWS).filter(|&row| self.is_row_active(row)).count() != 1 {
            self.crosstalk_reads.set(self.crosstalk_reads.get() + 1);
        }
        if !self.settled.get() {
            self.unsettled_reads.set(self.unsettled_reads.get() + 1);
        }
        let closed = (0..ROWS).any(|row| self.is_closed(row, column));
        // an open column idles at the inactive level thanks to its pull resistor
        if closed {
            self.polarity.active() == embedded_hal::digital::PinState::High
        } else {
            self.polarity.inactive() == embedded_hal::digital::PinState::High
        }
    }
}

pub struct RowPin<'a, const ROWS: usize, const COLS: usize> {
    board: &'a Board<ROWS, COLS>,
    index: usize,
}

impl<const ROWS: usize, const COLS: usize> ErrorType for RowPin<'_, ROWS, COLS> {
    type Error = Infallible;
}

impl<const ROWS: usize, const COLS: usize> OutputPin for RowPin<'_, ROWS, COLS> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.board.rows[self.index].set(false);
        self.board.settled.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.board.rows[self.index].set(true);
        self.board.settled.set(false);
        Ok(())
    }
}

pub struct ColumnPin<'a, const ROWS: usize, const COLS: usize> {
    board: &'a Board<ROWS, COLS>,
    index: usize,
}

impl<const ROWS: usize, const COLS: usize> ErrorType for ColumnPin<'_, ROWS, COLS> {
    type Error = Infallible;
}

impl<const ROWS: usize, const COLS: usize> InputPin for ColumnPin<'_, ROWS, COLS> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.board.read_column(self.index))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.board.read_column(self.index))
    }
}

pub struct SettleDelay<'a, const ROWS: usize, const COLS: usize> {
    board: &'a Board<ROWS, COLS>,
}

impl<const ROWS: usize, const COLS: usize> DelayNs for SettleDelay<'_, ROWS, COLS> {
    fn delay_ns(&mut self, ns: u32) {
        let settled_ns = &self.board.settled_ns;
        settled_ns.set(settled_ns.get() + u64::from(ns));
        self.board.settled.set(true);
    }
}

/// Remembers every message it is sent, up to 32.
#[derive(Default)]
pub struct Recorder {
    pub messages: ArrayVec<[[u8; 3]; 32]>,
}

impl MidiSink for Recorder {
    fn send(&mut self, message: [u8; 3]) {
        self.messages.push(message);
    }
}

impl Recorder {
    /// Returns the recorded messages and forgets them.
    pub fn take(&mut self) -> ArrayVec<[[u8; 3]; 32]> {
        core::mem::take(&mut self.messages)
    }
}

/// An LED that remembers its level and how often it was written.
#[derive(Default)]
pub struct Led {
    pub lit: bool,
    pub writes: usize,
}

impl ErrorType for Led {
    type Error = Infallible;
}

impl OutputPin for Led {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.lit = false;
        self.writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.lit = true;
        self.writes += 1;
        Ok(())
    }
}
