//! Property test suite entry point.

#[path = "../common/mod.rs"]
mod common;
