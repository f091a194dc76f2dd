//! Command implementations for the clubhub CLI

pub mod serve;

pub use serve::run_serve;
