//! CLI subcommands.

pub mod auto;
pub mod batch;
pub mod classify;
pub mod config;
pub mod list;
pub mod rename;
pub mod split;

mod context;
mod staging;
