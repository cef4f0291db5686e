/// Determines how many consecutive sweeps must sample a key at its new level before the transition is accepted.
///
/// By default no filtering happens beyond the electrical settle delay of the scan: a single sample is enough to
/// register a press or a release, which keeps latency at one sweep but lets contact bounce through as extra Note
/// On/Note Off pairs. Switches that chatter can be tamed with [`Debounce::Sweeps`] at the cost of `n - 1` sweeps
/// of added latency on every transition.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Debounce {
    /// Every sampled level change is a transition.
    #[default]
    None,
    /// A level change must be sampled on this many consecutive sweeps. `0` and `1` behave like [`Debounce::None`].
    Sweeps(u8),
}

impl Debounce {
    /// Returns the number of consecutive samples required to accept a transition. Never less than one.
    pub fn required_samples(&self) -> u8 {
        match self {
            Self::None => 1,
            Self::Sweeps(n) => (*n).max(1),
        }
    }
}
