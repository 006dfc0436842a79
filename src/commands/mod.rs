// src/commands/mod.rs
//! Command implementations for tapster

mod formula;
mod install;

pub use formula::{cmd_info, cmd_list, cmd_validate};
pub use install::{cmd_install, InstallOptions};
