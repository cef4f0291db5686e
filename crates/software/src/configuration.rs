//! Compile-time settings of the keyboard: how matrix positions map to notes, how the matrix lines are driven,
//! and whether key transitions are debounced.
//!
//! None of these can be changed at runtime; the firmware declares them as constants next to its pin assignments.

mod debounce;
pub use debounce::*;

mod layout;
pub use layout::*;

mod polarity;
pub use polarity::*;
