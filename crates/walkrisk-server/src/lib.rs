//! Shared library surface for the walk-risk server and its tests.

pub mod api;
pub mod config;
pub mod state;
