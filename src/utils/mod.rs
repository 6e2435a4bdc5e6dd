//! Utility modules shared by the commands.

pub mod hash;
pub mod mime;
