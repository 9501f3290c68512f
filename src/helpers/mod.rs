//! Helper functions shared by the CLI and the API server

mod date;

pub use date::*;
