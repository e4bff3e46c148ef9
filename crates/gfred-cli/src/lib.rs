//! Command-line front end for the GFRED mission validation core.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod summary;
