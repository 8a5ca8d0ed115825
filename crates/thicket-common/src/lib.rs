//! Common utilities for the Thicket parser crates.
//!
//! This crate provides shared infrastructure used by all parser components:
//! - **Warning System** - colored, de-duplicated terminal output for
//!   conditions a caller should hear about but that never stop a parse

pub mod warning;
