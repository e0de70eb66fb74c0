//! CLI module for the toolchain

pub mod commands;

pub use commands::*;
