//! Idol management game API server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! engine, background tasks) so integration tests and the binary entrypoint
//! can both access them.

pub mod background;
pub mod config;
pub mod dice;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod locks;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
