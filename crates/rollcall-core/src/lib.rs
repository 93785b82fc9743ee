//! Shared building blocks for Rollcall services: clock abstraction, health
//! probes, HTTP middleware, serde helpers and tracing setup.

pub mod clock;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
