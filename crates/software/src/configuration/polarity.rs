use embedded_hal::digital::PinState;

/// Electrical convention of the matrix: the level a selected row is driven to, which is also the level a column
/// reads when a key of the selected row closes the circuit.
///
/// With [`Polarity::ActiveHigh`] the columns need pull-downs; with [`Polarity::ActiveLow`] they need pull-ups.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Selected row driven high, pressed keys read high.
    #[default]
    ActiveHigh,
    /// Selected row driven low, pressed keys read low.
    ActiveLow,
}

impl Polarity {
    /// Returns the level that selects a row.
    pub fn active(&self) -> PinState {
        match self {
            Self::ActiveHigh => PinState::High,
            Self::ActiveLow => PinState::Low,
        }
    }

    /// Returns the level of a row that is not being scanned.
    pub fn inactive(&self) -> PinState {
        !self.active()
    }

    /// Interprets a column sample (`true` meaning the line read high) as pressed or not.
    pub fn is_asserted(&self, is_high: bool) -> bool {
        match self {
            Self::ActiveHigh => is_high,
            Self::ActiveLow => !is_high,
        }
    }
}
