use super::ConnectionPhase;

/// Derives the [`ConnectionPhase`] from the events a USB device stack reports.
///
/// The most recent event decides the phase, except that resuming from suspend returns to whatever the
/// configuration state is at that point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsbLink {
    configured: bool,
    phase: ConnectionPhase,
}

impl UsbLink {
    /// Returns the current [`ConnectionPhase`].
    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    /// Records that the host configured (mounted) or deconfigured the device. Returns the new phase.
    pub fn set_configured(&mut self, configured: bool) -> ConnectionPhase {
        self.configured = configured;
        self.phase = self.unsuspended_phase();
        self.phase
    }

    /// Records that the bus was suspended or resumed. Returns the new phase.
    pub fn set_suspended(&mut self, suspended: bool) -> ConnectionPhase {
        self.phase = if suspended {
            ConnectionPhase::Suspended
        } else {
            self.unsuspended_phase()
        };
        self.phase
    }

    /// Records a bus reset, or the device being disabled. Returns the new phase.
    pub fn reset(&mut self) -> ConnectionPhase {
        self.configured = false;
        self.phase = ConnectionPhase::NotConnected;
        self.phase
    }

    fn unsuspended_phase(&self) -> ConnectionPhase {
        if self.configured {
            ConnectionPhase::Connected
        } else {
            ConnectionPhase::NotConnected
        }
    }
}
