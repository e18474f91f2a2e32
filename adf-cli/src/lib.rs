//! Support code for the `adf` binary.

pub mod transforms;
