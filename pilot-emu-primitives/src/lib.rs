//! Fixed-endian integer primitives shared by the emulation crates.
//!
//! The guest is a big-endian platform; these types keep values in guest byte
//! order in memory while exposing host-native accessors.

pub mod primitive;

pub use primitive::{BeI16, BeI32, BeI8, BeU16, BeU32, BeU8};
