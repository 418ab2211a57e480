//! Protocol-agnostic core for the ftpgate gateway.
//!
//! The HTTP layer builds a [`model::Command`] per request and hands it to the
//! [`handler::CommandHandler`], which opens exactly one remote session, runs
//! the operation against a [`client::RemoteClient`], and always releases the
//! session before returning a protocol-neutral [`model::HttpResult`].

pub mod client;
pub mod errors;
pub mod filter;
pub mod handler;
pub mod model;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
