//! Library side of the `redcap-lake` binary: argument definitions, command
//! implementations and logging setup.

pub mod cli;
pub mod commands;
pub mod logging;
