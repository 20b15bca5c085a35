// Allow dead code during development phase
#![allow(dead_code)]

pub mod cli;
pub mod config;
pub mod logging;
pub mod registry;
