//! caseview: browse and run registered tests
//!
//! Tests are registered per declaring type through [`registry::Registry`],
//! arranged into a code view and a category view by [`tree`], executed
//! concurrently by [`executor`] and shown in an interactive terminal explorer
//! ([`tui`]) or as headless reports ([`output`]).

pub mod assert;
pub mod cli;
pub mod config;
pub mod executor;
pub mod models;
pub mod navigation;
pub mod output;
pub mod registry;
pub mod render;
pub mod tree;
pub mod tui;
pub mod utils;
