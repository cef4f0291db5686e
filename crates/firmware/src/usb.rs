//! Tasks and types that connect the keyboard to the USB host: the device task, the MIDI writer, and the
//! bookkeeping that turns USB bus events into a [`ConnectionPhase`].

use crate::keyboard::KeyScanner;
use defmt::{panic, *};
use embassy_futures::select::select;
use embassy_rp::{peripherals::USB, usb::Driver};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{self, Channel},
    watch::{self, Watch},
};
use embassy_usb::{Handler, UsbDevice, class::midi::MidiClass, driver::EndpointError};
use midi_keyboard_lib::{
    status::{ConnectionPhase, UsbLink},
    usb_midi::{CABLE, event_packet},
};

pub type UsbDriver = Driver<'static, USB>;

const CONNECTION_PHASE_RECEIVER_CNT: usize = 1;
/// Publishes the [`ConnectionPhase`] from the USB stack to the polling loop.
pub static CONNECTION_PHASE_SYNC: Watch<
    CriticalSectionRawMutex,
    ConnectionPhase,
    CONNECTION_PHASE_RECEIVER_CNT,
> = Watch::new_with(ConnectionPhase::NotConnected);
pub type ConnectionPhaseSender<'a> =
    watch::Sender<'a, CriticalSectionRawMutex, ConnectionPhase, CONNECTION_PHASE_RECEIVER_CNT>;
pub type ConnectionPhaseReceiver<'a> =
    watch::Receiver<'a, CriticalSectionRawMutex, ConnectionPhase, CONNECTION_PHASE_RECEIVER_CNT>;

/// Messages waiting to be written. The polling loop only yields to [`midi_task`] between sweeps, so the outbox
/// holds everything one sweep can send.
const MIDI_OUTBOX_CAPACITY: usize = KeyScanner::MAX_MESSAGES_PER_SWEEP;
/// Carries MIDI messages from the polling loop to [`midi_task`].
pub static MIDI_OUTBOX: Channel<CriticalSectionRawMutex, [u8; 3], MIDI_OUTBOX_CAPACITY> =
    Channel::new();
pub type MidiOutboxSender<'a> =
    channel::Sender<'a, CriticalSectionRawMutex, [u8; 3], MIDI_OUTBOX_CAPACITY>;
pub type MidiOutboxReceiver<'a> =
    channel::Receiver<'a, CriticalSectionRawMutex, [u8; 3], MIDI_OUTBOX_CAPACITY>;

/// Receives bus events from the USB stack and publishes the resulting [`ConnectionPhase`] whenever it changes.
pub struct ConnectionPhaseHandler {
    link: UsbLink,
    phase: ConnectionPhaseSender<'static>,
}

impl ConnectionPhaseHandler {
    pub fn new(phase: ConnectionPhaseSender<'static>) -> Self {
        Self {
            link: UsbLink::default(),
            phase,
        }
    }

    fn publish(&mut self, previous: ConnectionPhase) {
        let phase = self.link.phase();
        if phase != previous {
            info!("USB link {} -> {}", previous, phase);
            self.phase.send(phase);
        }
    }
}

impl Handler for ConnectionPhaseHandler {
    fn enabled(&mut self, enabled: bool) {
        if !enabled {
            let previous = self.link.phase();
            self.link.reset();
            self.publish(previous);
        }
    }

    fn reset(&mut self) {
        let previous = self.link.phase();
        self.link.reset();
        self.publish(previous);
    }

    fn configured(&mut self, configured: bool) {
        let previous = self.link.phase();
        self.link.set_configured(configured);
        self.publish(previous);
    }

    fn suspended(&mut self, suspended: bool) {
        let previous = self.link.phase();
        self.link.set_suspended(suspended);
        self.publish(previous);
    }
}

#[embassy_executor::task]
pub async fn usb_task(mut usb: UsbDevice<'static, UsbDriver>) -> ! {
    usb.run().await
}

/// Writes queued MIDI messages to the host while the MIDI endpoints are up.
#[embassy_executor::task]
pub async fn midi_task(
    mut class: MidiClass<'static, UsbDriver>,
    outbox: MidiOutboxReceiver<'static>,
) -> ! {
    loop {
        // whatever piles up while disconnected is stale by the time the host comes back
        let _ = select(class.wait_connection(), discard(&outbox)).await;
        info!("USB connected");
        let _ = forward_midi(&mut class, &outbox).await;
        info!("USB disconnected");
    }
}

async fn discard(outbox: &MidiOutboxReceiver<'static>) -> ! {
    loop {
        let message = outbox.receive().await;
        trace!("Discarding stale MIDI message {}", message);
    }
}

#[doc(hidden)]
struct Disconnected {}

impl From<EndpointError> for Disconnected {
    fn from(val: EndpointError) -> Self {
        match val {
            EndpointError::BufferOverflow => panic!("Buffer overflow"),
            EndpointError::Disabled => Disconnected {},
        }
    }
}

/// Helper function which frames each queued message as a USB-MIDI event packet and writes it out.
async fn forward_midi(
    class: &mut MidiClass<'static, UsbDriver>,
    outbox: &MidiOutboxReceiver<'static>,
) -> Result<(), Disconnected> {
    loop {
        let message = outbox.receive().await;
        class.write_packet(&event_packet(CABLE, message)).await?;
    }
}
