//! Shared plumbing for the droop command-line tools
//!
//! `droop-char` and `droop-nv` are thin binaries over [`commands`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
