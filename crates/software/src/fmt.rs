//! Logging shims. Statements forward to [`defmt`] when the `defmt` feature is enabled and compile to nothing
//! otherwise, so host builds need no global logger.

#![macro_use]

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(not(feature = "defmt"))]
            let _ = ($( &$x, )*);
        }
    };
}
