//! Particles in a periodic cell, and the padding particles used to account
//! for periodic boundary conditions when building neighbor lists.

mod cell;
pub use self::cell::PeriodicCell;

mod padding;
pub use self::padding::{create_paddings, Paddings, PaddingRecord};

mod configuration;
pub use self::configuration::{Configuration, PaddedConfiguration};

mod xyz;
pub use self::xyz::write_extended_xyz;

#[cfg(test)]
pub(crate) mod test_utils;
