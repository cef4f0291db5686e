use crate::configuration::Polarity;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

/// Settle time after selecting a row, in microseconds.
///
/// Must exceed the RC settle time of the column inputs (pull resistor against line and pin capacitance), or keys of
/// the previously selected row bleed into the current one. Note that this is a hard timing requirement of the
/// circuit rather than a tuning knob; it is also the only busy wait of the polling loop, so it should stay short.
pub const DEFAULT_SETTLE_TIME_US: u32 = 30;

/// Hardware access needed to scan a `ROWS` × `COLS` key matrix.
pub trait ScanMatrix<const ROWS: usize, const COLS: usize> {
    /// Deactivates every row, activates `row` alone, and blocks until the column lines have settled.
    ///
    /// Only one row may be active while columns are sampled; otherwise current through pressed keys of other
    /// rows shows up as phantom ("ghost") key presses.
    fn select_row(&mut self, row: usize);

    /// Samples `column` once. A line that cannot be read counts as not asserted.
    fn is_column_asserted(&mut self, column: usize) -> bool;
}

/// A [`ScanMatrix`] made of [`embedded_hal`] pins: one output per row, one input per column, and a delay
/// provider for the settle time.
///
/// Constructing a `PinMatrix` does not touch the lines; configure their directions, pulls, and idle levels
/// beforehand.
pub struct PinMatrix<O, I, D, const ROWS: usize, const COLS: usize> {
    rows: [O; ROWS],
    columns: [I; COLS],
    delay: D,
    polarity: Polarity,
    settle_time_us: u32,
}

impl<O, I, D, const ROWS: usize, const COLS: usize> PinMatrix<O, I, D, ROWS, COLS>
where
    O: OutputPin,
    I: InputPin,
    D: DelayNs,
{
    /// Constructs a [`PinMatrix`] with the [default settle time](DEFAULT_SETTLE_TIME_US).
    pub fn new(rows: [O; ROWS], columns: [I; COLS], delay: D, polarity: Polarity) -> Self {
        Self {
            rows,
            columns,
            delay,
            polarity,
            settle_time_us: DEFAULT_SETTLE_TIME_US,
        }
    }

    /// Overrides the settle time applied after each row selection.
    pub fn with_settle_time(mut self, micros: u32) -> Self {
        self.settle_time_us = micros;
        self
    }

    /// Returns the settle time applied after each row selection, in microseconds.
    pub fn settle_time_us(&self) -> u32 {
        self.settle_time_us
    }
}

impl<O, I, D, const ROWS: usize, const COLS: usize> ScanMatrix<ROWS, COLS>
    for PinMatrix<O, I, D, ROWS, COLS>
where
    O: OutputPin,
    I: InputPin,
    D: DelayNs,
{
    fn select_row(&mut self, row: usize) {
        // write failures are ignored; the affected keys simply read as released
        for line in self.rows.iter_mut() {
            let _ = line.set_state(self.polarity.inactive());
        }
        if let Some(line) = self.rows.get_mut(row) {
            let _ = line.set_state(self.polarity.active());
        }
        self.delay.delay_us(self.settle_time_us);
    }

    fn is_column_asserted(&mut self, column: usize) -> bool {
        let polarity = self.polarity;
        self.columns
            .get_mut(column)
            .and_then(|line| line.is_high().ok())
            .is_some_and(|is_high| polarity.is_asserted(is_high))
    }
}
