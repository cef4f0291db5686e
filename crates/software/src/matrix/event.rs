use wmidi::{Channel, MidiMessage, Note, U7, Velocity};

/// Status byte of a Note On message on the lowest channel.
pub const NOTE_ON: u8 = 0x90;
/// Status byte of a Note Off message on the lowest channel.
pub const NOTE_OFF: u8 = 0x80;

/// The single channel all key events are sent on.
pub const CHANNEL: Channel = Channel::Ch1;
/// The keys are not velocity sensitive; every press is sent at full velocity.
pub const PRESS_VELOCITY: Velocity = U7::from_u8_lossy(127);
/// Velocity of every release.
pub const RELEASE_VELOCITY: Velocity = U7::from_u8_lossy(0);

/// A key transition detected by the [`Scanner`](super::Scanner).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyEvent {
    /// The key was pressed; becomes a Note On.
    Pressed(Note),
    /// The key was released; becomes a Note Off.
    Released(Note),
}

impl KeyEvent {
    /// Encodes the event as a three byte MIDI message: status, note number, velocity.
    pub fn to_bytes(&self) -> [u8; 3] {
        match *self {
            Self::Pressed(note) => [
                NOTE_ON | CHANNEL.index(),
                note as u8,
                u8::from(PRESS_VELOCITY),
            ],
            Self::Released(note) => [
                NOTE_OFF | CHANNEL.index(),
                note as u8,
                u8::from(RELEASE_VELOCITY),
            ],
        }
    }
}

impl From<KeyEvent> for MidiMessage<'static> {
    fn from(event: KeyEvent) -> Self {
        match event {
            KeyEvent::Pressed(note) => MidiMessage::NoteOn(CHANNEL, note, PRESS_VELOCITY),
            KeyEvent::Released(note) => MidiMessage::NoteOff(CHANNEL, note, RELEASE_VELOCITY),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for KeyEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match *self {
            Self::Pressed(note) => {
                defmt::write!(fmt, "Pressed({} ({}))", note.to_str(), note as u8)
            }
            Self::Released(note) => {
                defmt::write!(fmt, "Released({} ({}))", note.to_str(), note as u8)
            }
        }
    }
}

/// Anything that accepts three byte MIDI messages.
///
/// Sending is fire-and-forget: implementations must not block, and may drop messages they cannot deliver.
pub trait MidiSink {
    /// Hands a message to the transport.
    fn send(&mut self, message: [u8; 3]);
}
