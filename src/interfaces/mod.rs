//! Outer boundary: CSV readers and writers used by the binary.

pub mod csv;
