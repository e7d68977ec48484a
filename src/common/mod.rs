//! Common helpers shared by the part writers.

pub mod fatal;
pub mod num;
pub mod unit;
pub mod xml;
