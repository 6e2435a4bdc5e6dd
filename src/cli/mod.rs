//! Command-line interface module.

mod args;
pub mod init;
pub mod inspect;
pub mod render;
pub mod serve;

pub use args::{Cli, Commands, InspectArgs, RenderArgs, StyleArgs};
