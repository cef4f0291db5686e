use embassy_time::{Duration, Instant};

mod usb_link;
pub use usb_link::*;

/// Lifecycle stage of the USB link, as reported by the USB stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionPhase {
    /// Not enumerated by a host (or unplugged).
    #[default]
    NotConnected,
    /// Enumerated and configured; MIDI can flow.
    Connected,
    /// The host suspended the bus.
    Suspended,
}

impl ConnectionPhase {
    /// Returns the time between two toggles of the status LED in this phase.
    pub const fn blink_interval(self) -> Duration {
        match self {
            Self::NotConnected => Duration::from_millis(250),
            Self::Connected => Duration::from_millis(1000),
            Self::Suspended => Duration::from_millis(2500),
        }
    }

    /// Returns true if MIDI sent in this phase is lost.
    ///
    /// A suspended bus keeps the device configured, so messages sent while suspended wait in the transport and
    /// reach the host once it resumes the bus.
    pub const fn drops_midi(self) -> bool {
        matches!(self, Self::NotConnected)
    }
}

/// Blinks the status LED at the rate of the current [`ConnectionPhase`] without ever blocking.
///
/// Call [`advance`](Self::advance) as often as convenient. Whenever a full interval has passed since the last
/// toggle, the level flips and the toggle time moves forward by exactly one interval rather than to the current
/// time. Late calls therefore don't push later toggles back, and over the long run the LED toggles exactly once
/// per interval.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusIndicator {
    last_toggle: Instant,
    lit: bool,
}

impl StatusIndicator {
    /// Constructs a dark [`StatusIndicator`] whose first interval starts at `baseline`.
    pub const fn new(baseline: Instant) -> Self {
        Self {
            last_toggle: baseline,
            lit: false,
        }
    }

    /// Toggles the LED if an interval of `phase` has elapsed since the last toggle. Returns the new level if it
    /// changed, `None` otherwise.
    ///
    /// A change of `phase` only affects when the next toggle is due; the last toggle time is kept.
    pub fn advance(&mut self, now: Instant, phase: ConnectionPhase) -> Option<bool> {
        let interval = phase.blink_interval();
        if now.saturating_duration_since(self.last_toggle) < interval {
            return None;
        }
        self.last_toggle += interval;
        self.lit = !self.lit;
        Some(self.lit)
    }

    /// Returns the time of the last toggle, or the baseline if there hasn't been one.
    pub fn last_toggle(&self) -> Instant {
        self.last_toggle
    }
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self::new(Instant::from_ticks(0))
    }
}
