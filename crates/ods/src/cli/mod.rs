//! CLI support for the `ods` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod output;
