//! Group sequence resolution

mod generator;
mod iterator;

pub use generator::GroupSequenceGenerator;
pub use iterator::GroupSequenceIterator;
