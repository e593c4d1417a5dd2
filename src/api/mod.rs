//! HTTP transport layer
//!
//! JSON-over-HTTP surface for the wagering core. The core itself is
//! transport-agnostic; this layer only parses requests, verifies the
//! bearer token, and maps domain results and errors to the wire.

pub mod auth;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use server::ApiServer;
