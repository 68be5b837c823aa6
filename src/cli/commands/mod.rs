//! Command implementations for the primesift CLI

pub mod scan;
