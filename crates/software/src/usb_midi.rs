//! Framing of MIDI messages for the USB MIDI class.
//!
//! USB carries MIDI in 32-bit event packets: a header byte holding the virtual cable number and a code index
//! number (CIN) that classifies the message, followed by the (up to) three bytes of the message itself.

/// The keyboard exposes a single virtual cable.
pub const CABLE: u8 = 0;

/// Wraps a three byte channel voice message into a USB-MIDI event packet on `cable`.
///
/// For channel voice messages the code index number equals the upper nibble of the status byte.
pub fn event_packet(cable: u8, message: [u8; 3]) -> [u8; 4] {
    let header = (cable & 0x0F) << 4 | message[0] >> 4;
    [header, message[0], message[1], message[2]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::KeyEvent;
    use wmidi::{MidiMessage, Note};

    #[test]
    fn note_on_packet() {
        assert_eq!(
            [0x09, 0x90, 60, 127],
            event_packet(CABLE, KeyEvent::Pressed(Note::C4).to_bytes()),
            "Expected left but got right"
        );
    }

    #[test]
    fn note_off_packet() {
        assert_eq!(
            [0x08, 0x80, 60, 0],
            event_packet(CABLE, KeyEvent::Released(Note::C4).to_bytes()),
            "Expected left but got right"
        );
    }

    #[test]
    fn cable_number_occupies_upper_nibble() {
        assert_eq!(
            0x39,
            event_packet(3, [0x90, 60, 127])[0],
            "Expected left but got right"
        );
    }

    #[test]
    fn packet_body_is_the_message() {
        let event = KeyEvent::Pressed(Note::Ab3);
        let packet = event_packet(CABLE, event.to_bytes());
        assert_eq!(
            MidiMessage::from(event),
            MidiMessage::from_bytes(&packet[1..]).unwrap(),
            "Expected left but got right"
        );
    }
}
