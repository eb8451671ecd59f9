//! Lingua API Library Crate
//!
//! This library contains all the core logic for the Lingua mission web
//! service: the application state, access to the mission/learner database,
//! API handlers, and routing. The `bin/api.rs` binary is a thin wrapper
//! around this library.

pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
