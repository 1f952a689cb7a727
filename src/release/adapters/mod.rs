//! Adapter implementations of the release ports.

pub mod memory;
pub mod postgres;
