use crate::{
    matrix::{MidiSink, ScanMatrix, Scanner},
    status::{ConnectionPhase, StatusIndicator},
};
use embassy_time::Instant;
use embedded_hal::digital::{OutputPin, PinState};

/// The USB side of the keyboard as seen from the polling loop.
pub trait Transport: MidiSink {
    /// Gives the USB stack a chance to make progress and picks up its latest [`ConnectionPhase`].
    ///
    /// Called once at the start of every [`Keyboard::poll`]; the host's liveness requirements are met only if
    /// the loop keeps polling often enough.
    fn service(&mut self);

    /// Returns the [`ConnectionPhase`] observed by the last [`service`](Self::service).
    fn phase(&self) -> ConnectionPhase;
}

/// A matrix keyboard with a status LED and an activity LED, driven by a cooperative polling loop.
///
/// Each call to [`poll`](Self::poll) runs one iteration of the loop, in this fixed order:
///
/// 1. service the [`Transport`];
/// 2. advance the [`StatusIndicator`], writing the status LED if it toggled;
/// 3. sweep the whole matrix, sending a MIDI message for every key transition;
/// 4. light the activity LED if any key was physically pressed during the sweep, darken it otherwise.
///
/// Nothing in an iteration blocks except the settle delay after each row selection.
pub struct Keyboard<M, L, const ROWS: usize, const COLS: usize> {
    matrix: M,
    scanner: Scanner<ROWS, COLS>,
    indicator: StatusIndicator,
    status_led: L,
    activity_led: L,
}

impl<M, L, const ROWS: usize, const COLS: usize> Keyboard<M, L, ROWS, COLS>
where
    M: ScanMatrix<ROWS, COLS>,
    L: OutputPin,
{
    /// Constructs a [`Keyboard`]; the status LED's first blink interval starts at `baseline`.
    pub fn new(
        matrix: M,
        scanner: Scanner<ROWS, COLS>,
        status_led: L,
        activity_led: L,
        baseline: Instant,
    ) -> Self {
        Self {
            matrix,
            scanner,
            indicator: StatusIndicator::new(baseline),
            status_led,
            activity_led,
        }
    }

    /// Runs one iteration of the polling loop at time `now`. Returns true if any key is pressed.
    pub fn poll<T: Transport>(&mut self, transport: &mut T, now: Instant) -> bool {
        transport.service();

        if let Some(lit) = self.indicator.advance(now, transport.phase()) {
            let _ = self.status_led.set_state(PinState::from(lit));
        }

        let any_pressed = self.scanner.sweep(&mut self.matrix, transport);
        let _ = self.activity_led.set_state(PinState::from(any_pressed));
        any_pressed
    }

    /// Returns the [`Scanner`] and with it the state of every key.
    pub fn scanner(&self) -> &Scanner<ROWS, COLS> {
        &self.scanner
    }

    /// Returns the [`StatusIndicator`].
    pub fn indicator(&self) -> &StatusIndicator {
        &self.indicator
    }
}
