use crate::configuration::Debounce;

/// What the scanner remembers about a single key between sweeps.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct KeyState {
    /// The logical state: true from the accepted press until the accepted release.
    held: bool,
    /// Consecutive samples that disagreed with `held`.
    pending: u8,
}

impl KeyState {
    pub(crate) fn is_held(&self) -> bool {
        self.held
    }

    /// Feeds one sample. Returns true when the sample completes a transition, which the caller is expected to
    /// report before [`commit`](Self::commit)ting it.
    pub(crate) fn accepts(&mut self, pressed: bool, debounce: Debounce) -> bool {
        if pressed == self.held {
            self.pending = 0;
            return false;
        }
        self.pending = self.pending.saturating_add(1);
        self.pending >= debounce.required_samples()
    }

    pub(crate) fn commit(&mut self, pressed: bool) {
        self.held = pressed;
        self.pending = 0;
    }
}
