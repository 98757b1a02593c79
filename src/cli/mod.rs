//! Command-line interface module.

mod args;
mod common;
pub mod export;
pub mod fields;
pub mod pages;
pub mod publish;
pub mod serve;

pub use args::{Cli, Commands};
