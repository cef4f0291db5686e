//! [Embassy](https://embassy.dev)-based firmware that turns a button matrix wired to a
//! [Raspberry Pi Pico](https://www.raspberrypi.com/documentation/microcontrollers/pico-series.html) into a
//! class compliant USB MIDI keyboard.
//!
//! The 66 keys sit on an 11 × 6 matrix. Rows are driven one at a time and the columns, pulled down, read high
//! through any closed key of the driven row. A press sends a Note On at full velocity and a release a Note Off,
//! starting from C2 (MIDI note 36) on the first key and ascending row by row. One LED lights while any key is
//! down; another blinks at a rate that reflects the USB connection: fast while waiting for a host, once a second
//! when connected, slowly while the bus is suspended.
//!
//! All the scanning and timing logic lives in `midi_keyboard_lib`; this crate only assigns pins and wires up the
//! USB device.

#![no_std]
#![no_main]

mod keyboard;
mod usb;

use crate::{
    keyboard::{COLS, KeyScanner, ROWS, UsbTransport},
    usb::{CONNECTION_PHASE_SYNC, ConnectionPhaseHandler, MIDI_OUTBOX, midi_task, usb_task},
};
use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::{
    bind_interrupts,
    gpio::{Input, Level, Output, Pull},
    peripherals::USB,
    usb::{Driver, InterruptHandler},
};
use embassy_time::{Delay, Instant};
use embassy_usb::{Builder, class::midi::MidiClass};
use midi_keyboard_lib::{
    configuration::{DEFAULT_BASE_NOTE, Debounce, NoteLayout, Polarity},
    keyboard::Keyboard,
    matrix::PinMatrix,
};
use static_cell::StaticCell;

use defmt_rtt as _;
#[cfg(not(feature = "panic-probe"))]
use panic_halt as _;
#[cfg(feature = "panic-probe")]
use panic_probe as _;

bind_interrupts!(
    #[doc(hidden)]
    struct Irqs {
        USBCTRL_IRQ => InterruptHandler<USB>;
    }
);

/// Fails compilation if the highest key would land above MIDI note 127.
const LAYOUT: NoteLayout<ROWS, COLS> = NoteLayout::new(DEFAULT_BASE_NOTE);

// per https://pid.codes, FOSS projects can apply to be listed under the vendor ID owned by InterBiometrics;
// 0x0001 is the test PID reserved for private use
const VENDOR_ID: u16 = 0x1209;
const PRODUCT_ID: u16 = 0x0001;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Initializing MIDI keyboard");

    let p = embassy_rp::init(Default::default());

    // rows idle high until the first sweep selects them one by one
    let rows = [
        Output::new(p.PIN_0, Level::High),
        Output::new(p.PIN_1, Level::High),
        Output::new(p.PIN_2, Level::High),
        Output::new(p.PIN_3, Level::High),
        Output::new(p.PIN_4, Level::High),
        Output::new(p.PIN_11, Level::High),
        Output::new(p.PIN_12, Level::High),
        Output::new(p.PIN_13, Level::High),
        Output::new(p.PIN_17, Level::High),
        Output::new(p.PIN_18, Level::High),
        Output::new(p.PIN_19, Level::High),
    ];
    let columns = [
        Input::new(p.PIN_20, Pull::Down),
        Input::new(p.PIN_6, Pull::Down),
        Input::new(p.PIN_7, Pull::Down),
        Input::new(p.PIN_8, Pull::Down),
        Input::new(p.PIN_9, Pull::Down),
        Input::new(p.PIN_21, Pull::Down),
    ];
    let matrix = PinMatrix::new(rows, columns, Delay, Polarity::ActiveHigh);
    let scanner = KeyScanner::new(LAYOUT, Debounce::None);
    info!("Scanning {} with {}", LAYOUT, scanner.debounce());

    // the Pico's onboard LED shows key activity; the status LED is external
    let activity_led = Output::new(p.PIN_25, Level::Low);
    let status_led = Output::new(p.PIN_15, Level::Low);

    // Create the driver, from the HAL.
    let driver = Driver::new(p.USB, Irqs);

    let mut config = embassy_usb::Config::new(VENDOR_ID, PRODUCT_ID);
    config.manufacturer = Some("MIDI Keyboard");
    config.product = Some("Matrix MIDI Keyboard");
    config.serial_number = Some("0001");
    config.max_power = 100;

    // Create embassy-usb DeviceBuilder using the driver and config.
    // It needs some buffers for building the descriptors.
    static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static CONTROL_BUFFER: StaticCell<[u8; 64]> = StaticCell::new();

    let mut builder = Builder::new(
        driver,
        config,
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        &mut [], // no msos descriptors
        CONTROL_BUFFER.init([0; 64]),
    );

    static CONNECTION_PHASE_HANDLER: StaticCell<ConnectionPhaseHandler> = StaticCell::new();
    builder.handler(
        CONNECTION_PHASE_HANDLER.init(ConnectionPhaseHandler::new(CONNECTION_PHASE_SYNC.sender())),
    );

    // Create classes on the builder.
    let class = MidiClass::new(&mut builder, 1, 1, 64);

    // Build the builder.
    let usb = builder.build();

    spawner.spawn(unwrap!(usb_task(usb)));
    spawner.spawn(unwrap!(midi_task(class, MIDI_OUTBOX.receiver())));

    let transport = UsbTransport::new(
        CONNECTION_PHASE_SYNC
            .receiver()
            .expect("Connection phase synchronizer should have a receiver available"),
        MIDI_OUTBOX.sender(),
    );
    let keyboard = Keyboard::new(matrix, scanner, status_led, activity_led, Instant::now());
    spawner.spawn(unwrap!(keyboard::keyboard(keyboard, transport)));
}
