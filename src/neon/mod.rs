//! Neon API integration
//!
//! Branches, endpoints and connection strings are fetched fresh on every
//! command through the [`BranchApi`] trait; [`NeonClient`] is the HTTP
//! implementation.

pub mod client;
pub mod traits;
pub mod types;

pub use client::{NeonClient, DEFAULT_API_URL};
pub use traits::{BranchApi, ConnectionUriRequest, RemoteError};
pub use types::{Branch, BranchState, ConnectionUris, Endpoint};
