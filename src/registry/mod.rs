//! Typed access to the Smithery registry.
//!
//! [`SmitheryRegistry`] is the entry point; [`Servers`] groups the server
//! operations:
//!
//! - `GET /servers`: [`Servers::list`], paginated
//! - `GET /servers/{qualifiedName}`: [`Servers::get`]

mod client;
mod servers;

pub use client::{SmitheryRegistry, SmitheryRegistryBuilder};
pub use servers::Servers;
