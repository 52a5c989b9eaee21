// Crate root library declaration and module exports.
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod journal;
pub mod model;
pub mod paths;
pub mod storage;
pub mod tasks;
