//! Store adapters. Only the in-memory test double ships with the engine;
//! production deployments bring their own relational implementation of the
//! store ports.

pub mod memory;

pub use memory::*;
