//! Domain models for the medlookup system.

mod medicine;
mod parsed;

pub use medicine::*;
pub use parsed::*;
