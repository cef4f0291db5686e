//! The polling loop and its view of the USB transport.

use crate::usb::{ConnectionPhaseReceiver, MidiOutboxSender};
use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_time::{Delay, Duration, Instant, Timer};
use midi_keyboard_lib::{
    keyboard::{Keyboard, Transport},
    matrix::{MidiSink, PinMatrix, Scanner},
    status::ConnectionPhase,
};

pub const ROWS: usize = 11;
pub const COLS: usize = 6;

/// Pause between two iterations of the polling loop. Yielding here is what lets the USB tasks run.
const POLL_PERIOD: Duration = Duration::from_millis(2);

pub type KeyScanner = Scanner<ROWS, COLS>;
pub type KeyMatrix = PinMatrix<Output<'static>, Input<'static>, Delay, ROWS, COLS>;
pub type MatrixKeyboard = Keyboard<KeyMatrix, Output<'static>, ROWS, COLS>;

/// [`Transport`] backed by the USB tasks: the phase comes from the USB handler, messages go out through the
/// MIDI outbox.
pub struct UsbTransport {
    phase_sync: ConnectionPhaseReceiver<'static>,
    phase: ConnectionPhase,
    outbox: MidiOutboxSender<'static>,
}

impl UsbTransport {
    pub fn new(
        phase_sync: ConnectionPhaseReceiver<'static>,
        outbox: MidiOutboxSender<'static>,
    ) -> Self {
        Self {
            phase_sync,
            phase: ConnectionPhase::default(),
            outbox,
        }
    }
}

impl MidiSink for UsbTransport {
    fn send(&mut self, message: [u8; 3]) {
        // like a MIDI port nobody listens to, an unmounted device drops what it is sent
        if self.phase.drops_midi() {
            trace!("Dropping MIDI message {} while {}", message, self.phase);
            return;
        }
        if self.outbox.try_send(message).is_err() {
            warn!("MIDI outbox is full, dropping {}", message);
        }
    }
}

impl Transport for UsbTransport {
    fn service(&mut self) {
        if let Some(phase) = self.phase_sync.try_changed() {
            info!("Connection phase: {}", phase);
            self.phase = phase;
        }
    }

    fn phase(&self) -> ConnectionPhase {
        self.phase
    }
}

/// Task running the polling loop for the lifetime of the device.
#[embassy_executor::task]
pub async fn keyboard(mut keyboard: MatrixKeyboard, mut transport: UsbTransport) -> ! {
    loop {
        keyboard.poll(&mut transport, Instant::now());
        Timer::after(POLL_PERIOD).await;
    }
}
